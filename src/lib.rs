// ==========================================
// Tracker 导入管道 - 核心库
// ==========================================
// 职责: 跟踪数据批次导入前的预热、引用解析、校验与过滤
// 技术栈: Rust + tokio + SQLite（配置）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 导入对象、元数据、标识方案
pub mod domain;

// 预热层 - 元数据与已存在对象的一次性加载
pub mod preheat;

// 解析层 - 引用、维度表达式、AOC
pub mod resolver;

// 校验层 - 错误码、报告、钩子、引擎
pub mod validation;

// 预处理层 - 批次整理
pub mod preprocess;

// 导入层 - 编排与落库协作方
pub mod importer;

// 配置层 - 校验设置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

pub use config::{ConfigManager, TrackerConfigReader, ValidationSettings};
pub use domain::{
    AtomicMode, ImportStatus, RepeatableStageParams, TrackerBundle, TrackerImportReport,
    TrackerType,
};
pub use importer::{
    TrackerBundlePersister, TrackerImportError, TrackerImportResult, TrackerImporter,
    TrackerImporterImpl,
};
pub use preheat::{PreheatSnapshot, PreheatSnapshotProvider, TrackerPreheat};
pub use resolver::{CategoryService, IllegalQueryError, QueryItemLocator};
pub use validation::{TrackerError, TrackerErrorCode, ValidationEngine, ValidationReport};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "Tracker 导入管道";
