// ==========================================
// Tracker 导入管道 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 单个对象的校验问题不是 Rust 错误，记入 ValidationReport
// ==========================================

use crate::resolver::error::IllegalQueryError;
use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum TrackerImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("JSON 解析失败: {0}")]
    JsonParseError(String),

    // ===== 预热错误 =====
    #[error("预热快照拉取失败: {0}")]
    PreheatError(String),

    // ===== 落库协作方错误 =====
    #[error("落库失败: {0}")]
    PersistError(String),

    // ===== 数据库错误 =====
    #[error("数据库查询失败: {0}")]
    DatabaseQueryError(String),

    // ===== 配置错误 =====
    #[error("配置读取失败 (key: {key}): {message}")]
    ConfigReadError { key: String, message: String },

    #[error("配置值格式错误 (key: {key}, value: {value}): {message}")]
    ConfigValueError {
        key: String,
        value: String,
        message: String,
    },

    // ===== 查询维度错误 =====
    #[error(transparent)]
    IllegalQuery(#[from] IllegalQueryError),

    // ===== 通用错误 =====
    #[error("导入已取消")]
    Cancelled,

    #[error("锁获取失败: {0}")]
    LockError(String),

    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for TrackerImportError {
    fn from(err: std::io::Error) -> Self {
        TrackerImportError::FileReadError(err.to_string())
    }
}

// 实现 From<serde_json::Error>
impl From<serde_json::Error> for TrackerImportError {
    fn from(err: serde_json::Error) -> Self {
        TrackerImportError::JsonParseError(err.to_string())
    }
}

// 实现 From<rusqlite::Error>
impl From<rusqlite::Error> for TrackerImportError {
    fn from(err: rusqlite::Error) -> Self {
        TrackerImportError::DatabaseQueryError(err.to_string())
    }
}

/// Result 类型别名
pub type TrackerImportResult<T> = Result<T, TrackerImportError>;
