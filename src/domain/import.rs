// ==========================================
// Tracker 导入管道 - 导入结果模型
// ==========================================
// 职责: 单次导入的汇总报告（批次 ID、状态、分类型统计、校验报告、耗时）
// ==========================================

use crate::domain::types::{AtomicMode, ImportStatus, TrackerType};
use crate::validation::ValidationReport;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// TypeStats - 单类型统计
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeStats {
    pub total: usize,   // 批次中该类型对象数（预处理后）
    pub created: usize, // 交付落库
    pub ignored: usize, // 因错误或原子模式被忽略
}

// ==========================================
// PersistSummary - 落库结果
// ==========================================
// 落库协作方返回各类型实际写入数量
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistSummary {
    pub persisted: BTreeMap<TrackerType, usize>,
}

impl PersistSummary {
    pub fn count(&self, tracker_type: TrackerType) -> usize {
        self.persisted.get(&tracker_type).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.persisted.values().sum()
    }
}

// ==========================================
// TrackerImportReport - 导入报告
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerImportReport {
    pub import_id: String,
    pub status: ImportStatus,
    pub atomic_mode: AtomicMode,
    pub stats: BTreeMap<TrackerType, TypeStats>,
    pub duplicates_removed: usize, // 预处理剔除的重复关系
    pub validation_report: ValidationReport,
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: u64,
}

impl TrackerImportReport {
    pub fn stats_for(&self, tracker_type: TrackerType) -> TypeStats {
        self.stats.get(&tracker_type).copied().unwrap_or_default()
    }

    pub fn total_created(&self) -> usize {
        self.stats.values().map(|s| s.created).sum()
    }

    pub fn total_ignored(&self) -> usize {
        self.stats.values().map(|s| s.ignored).sum()
    }
}

/// 由错误与落库数量推导导入状态
pub fn derive_status(has_errors: bool, created: usize) -> ImportStatus {
    match (has_errors, created) {
        (false, _) => ImportStatus::Ok,
        (true, 0) => ImportStatus::Error,
        (true, _) => ImportStatus::Warning,
    }
}
