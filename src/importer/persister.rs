// ==========================================
// Tracker 导入管道 - 落库协作方实现
// ==========================================
// JsonFileBundlePersister: 将通过校验的批次写为 JSON 文件
// InMemoryBundlePersister: 内存收集（试运行与测试）
// ==========================================

use crate::domain::import::PersistSummary;
use crate::domain::tracker::TrackerBundle;
use crate::domain::types::TrackerType;
use crate::importer::error::{TrackerImportError, TrackerImportResult};
use crate::importer::tracker_importer_trait::TrackerBundlePersister;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};
use tracing::{info, instrument};

fn summarize(bundle: &TrackerBundle) -> PersistSummary {
    let mut summary = PersistSummary::default();
    for (tracker_type, count) in [
        (TrackerType::TrackedEntity, bundle.tracked_entities.len()),
        (TrackerType::Enrollment, bundle.enrollments.len()),
        (TrackerType::Event, bundle.events.len()),
        (TrackerType::Relationship, bundle.relationships.len()),
    ] {
        if count > 0 {
            summary.persisted.insert(tracker_type, count);
        }
    }
    summary
}

// ==========================================
// JsonFileBundlePersister
// ==========================================
pub struct JsonFileBundlePersister {
    path: PathBuf,
}

impl JsonFileBundlePersister {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl TrackerBundlePersister for JsonFileBundlePersister {
    #[instrument(skip(self, bundle), fields(path = %self.path.display()))]
    async fn persist(&self, bundle: &TrackerBundle) -> TrackerImportResult<PersistSummary> {
        let json = serde_json::to_string_pretty(bundle)?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| TrackerImportError::PersistError(format!("{}: {}", self.path.display(), e)))?;

        let summary = summarize(bundle);
        info!(persisted = summary.total(), "批次已写入 JSON 文件");
        Ok(summary)
    }
}

// ==========================================
// InMemoryBundlePersister
// ==========================================
#[derive(Debug, Default)]
pub struct InMemoryBundlePersister {
    persisted: Mutex<Vec<TrackerBundle>>,
}

impl InMemoryBundlePersister {
    pub fn new() -> Self {
        Self::default()
    }

    /// 已接收批次的副本
    pub fn persisted(&self) -> Vec<TrackerBundle> {
        self.persisted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl TrackerBundlePersister for InMemoryBundlePersister {
    async fn persist(&self, bundle: &TrackerBundle) -> TrackerImportResult<PersistSummary> {
        self.persisted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(bundle.clone());
        Ok(summarize(bundle))
    }
}
