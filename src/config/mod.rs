// ==========================================
// Tracker 导入管道 - 配置层
// ==========================================
// 职责: 校验设置读取，缺省回落默认值
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod settings;
pub mod tracker_config_trait;

pub use config_manager::{config_keys, ConfigManager};
pub use settings::{EncryptionStatus, ValidationSettings, DEFAULT_MAX_ATTRIBUTE_VALUE_LENGTH};
pub use tracker_config_trait::TrackerConfigReader;
