// ==========================================
// Tracker 导入管道 - 导入层
// ==========================================
// 职责: 编排预热、预处理、校验与落库
// 流程: 设置 → 预热 → 预处理 → 校验 → 原子模式过滤 → 落库 → 报告
// ==========================================

pub mod error;
pub mod persister;
pub mod tracker_importer_impl;
pub mod tracker_importer_trait;

pub use error::{TrackerImportError, TrackerImportResult};
pub use persister::{InMemoryBundlePersister, JsonFileBundlePersister};
pub use tracker_importer_impl::TrackerImporterImpl;
pub use tracker_importer_trait::{TrackerBundlePersister, TrackerImporter};
