// ==========================================
// Tracker 导入管道 - 预热快照与元数据提供方
// ==========================================
// 职责: 外部元数据拉取协作方接口（异步，单次导入只调用一次）
// 实现: JSON 文件 / 内存快照
// ==========================================

use crate::domain::metadata::{
    CategoryCombo, CategoryOption, CategoryOptionCombo, DataElement, FileResource, LegendSet,
    OrganisationUnit, Program, ProgramIndicator, ProgramInstance, ProgramStage,
    ProgramStageInstance, RelationshipType, TrackedEntityAttribute, TrackedEntityInstance,
    TrackedEntityType,
};
use crate::domain::tracker::TrackerBundle;
use crate::importer::error::{TrackerImportError, TrackerImportResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

// ==========================================
// PreheatSnapshot - 预热快照
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PreheatSnapshot {
    // ===== 元数据 =====
    pub organisation_units: Vec<OrganisationUnit>,
    pub programs: Vec<Program>,
    pub program_stages: Vec<ProgramStage>,
    pub tracked_entity_types: Vec<TrackedEntityType>,
    pub tracked_entity_attributes: Vec<TrackedEntityAttribute>,
    pub category_options: Vec<CategoryOption>,
    pub category_combos: Vec<CategoryCombo>,
    pub category_option_combos: Vec<CategoryOptionCombo>,
    pub relationship_types: Vec<RelationshipType>,
    pub data_elements: Vec<DataElement>,
    pub program_indicators: Vec<ProgramIndicator>,
    pub legend_sets: Vec<LegendSet>,

    // ===== 已持久化对象 =====
    pub tracked_entities: Vec<TrackedEntityInstance>,
    pub enrollments: Vec<ProgramInstance>,
    pub events: Vec<ProgramStageInstance>,
    pub file_resources: Vec<FileResource>,
}

// ==========================================
// PreheatSnapshotProvider Trait
// ==========================================
// 用途: 拉取本批次引用到的元数据与已持久化对象
// 实现者: JsonFileSnapshotProvider, InMemorySnapshotProvider
#[async_trait]
pub trait PreheatSnapshotProvider: Send + Sync {
    /// 为批次拉取预热快照
    ///
    /// # 参数
    /// - bundle: 导入批次（实现方可据此裁剪拉取范围）
    ///
    /// # 返回
    /// - Ok(PreheatSnapshot): 快照
    /// - Err: 拉取失败（整批失败）
    async fn fetch(&self, bundle: &TrackerBundle) -> TrackerImportResult<PreheatSnapshot>;
}

// ==========================================
// JsonFileSnapshotProvider - JSON 文件快照
// ==========================================
pub struct JsonFileSnapshotProvider {
    path: PathBuf,
}

impl JsonFileSnapshotProvider {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl PreheatSnapshotProvider for JsonFileSnapshotProvider {
    #[instrument(skip(self, _bundle), fields(path = %self.path.display()))]
    async fn fetch(&self, _bundle: &TrackerBundle) -> TrackerImportResult<PreheatSnapshot> {
        if !self.path.exists() {
            return Err(TrackerImportError::FileNotFound(
                self.path.display().to_string(),
            ));
        }

        let raw = tokio::fs::read_to_string(&self.path).await?;
        let snapshot: PreheatSnapshot = serde_json::from_str(&raw)?;

        info!(
            programs = snapshot.programs.len(),
            org_units = snapshot.organisation_units.len(),
            "预热快照读取完成"
        );
        Ok(snapshot)
    }
}

// ==========================================
// InMemorySnapshotProvider - 内存快照
// ==========================================
pub struct InMemorySnapshotProvider {
    snapshot: PreheatSnapshot,
}

impl InMemorySnapshotProvider {
    pub fn new(snapshot: PreheatSnapshot) -> Self {
        Self { snapshot }
    }
}

#[async_trait]
impl PreheatSnapshotProvider for InMemorySnapshotProvider {
    async fn fetch(&self, bundle: &TrackerBundle) -> TrackerImportResult<PreheatSnapshot> {
        debug!(objects = bundle.object_count(), "返回内存预热快照");
        Ok(self.snapshot.clone())
    }
}
