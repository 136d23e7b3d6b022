// ==========================================
// Tracker 导入管道 - 校验报告
// ==========================================
// 职责: 汇集结构化错误，维护"无效对象"集合
// 生命周期: 单个导入批次
// ==========================================

use crate::domain::tracker::TrackerDto;
use crate::domain::types::TrackerType;
use crate::validation::error_code::TrackerErrorCode;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// ==========================================
// TrackerError - 单条校验错误
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerError {
    pub uid: String,
    pub tracker_type: TrackerType,
    pub error_code: TrackerErrorCode,
    pub args: Vec<String>,
    pub message: String,
}

impl TrackerError {
    /// 针对某个导入对象创建错误（参数通过 arg 追加）
    pub fn new<D: TrackerDto + ?Sized>(dto: &D, error_code: TrackerErrorCode) -> Self {
        Self {
            uid: dto.uid().to_string(),
            tracker_type: dto.tracker_type(),
            error_code,
            args: Vec::new(),
            message: error_code.message_template().to_string(),
        }
    }

    /// 追加一个位置参数
    pub fn arg(mut self, arg: impl fmt::Display) -> Self {
        self.args.push(arg.to_string());
        self.message = self.error_code.format(&self.args);
        self
    }
}

impl fmt::Display for TrackerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} {}: {}",
            self.error_code, self.tracker_type, self.uid, self.message
        )
    }
}

// ==========================================
// ValidationReport - 校验报告
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    errors: Vec<TrackerError>,
    invalid_objects: BTreeMap<TrackerType, BTreeSet<String>>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加错误（只追加，不去重）
    pub fn add_error(&mut self, error: TrackerError) {
        self.errors.push(error);
    }

    /// 条件成立时追加错误；错误仅在需要时构造
    pub fn add_error_if<F>(&mut self, condition: bool, error: F)
    where
        F: FnOnce() -> TrackerError,
    {
        if condition {
            self.add_error(error());
        }
    }

    pub fn errors(&self) -> &[TrackerError] {
        &self.errors
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// 某个对象的全部错误
    pub fn errors_for<'a>(
        &'a self,
        tracker_type: TrackerType,
        uid: &'a str,
    ) -> impl Iterator<Item = &'a TrackerError> + 'a {
        self.errors
            .iter()
            .filter(move |e| e.tracker_type == tracker_type && e.uid == uid)
    }

    /// 某个错误码出现次数
    pub fn count_of(&self, error_code: TrackerErrorCode) -> usize {
        self.errors
            .iter()
            .filter(|e| e.error_code == error_code)
            .count()
    }

    pub fn has_error_code(&self, error_code: TrackerErrorCode) -> bool {
        self.count_of(error_code) > 0
    }

    /// 标记对象无效（后续校验器跳过，且不交付落库）
    pub fn mark_invalid(&mut self, tracker_type: TrackerType, uid: &str) {
        self.invalid_objects
            .entry(tracker_type)
            .or_default()
            .insert(uid.to_string());
    }

    /// 某对象是否有任何错误
    pub fn has_errors_for(&self, tracker_type: TrackerType, uid: &str) -> bool {
        self.errors_for(tracker_type, uid).next().is_some()
    }

    pub fn is_invalid(&self, tracker_type: TrackerType, uid: &str) -> bool {
        self.invalid_objects
            .get(&tracker_type)
            .is_some_and(|uids| uids.contains(uid))
    }

    pub fn invalid_count(&self, tracker_type: TrackerType) -> usize {
        self.invalid_objects
            .get(&tracker_type)
            .map_or(0, BTreeSet::len)
    }

    /// 合并另一份报告（批量导入汇总用）
    pub fn merge(&mut self, other: ValidationReport) {
        self.errors.extend(other.errors);
        for (tracker_type, uids) in other.invalid_objects {
            self.invalid_objects
                .entry(tracker_type)
                .or_default()
                .extend(uids);
        }
    }
}
