// ==========================================
// Tracker 导入管道 - 校验层
// ==========================================
// 职责: 错误码、校验报告、校验上下文、钩子与引擎
// 红线: 单个对象的问题只写入报告，不中断批次
// ==========================================

pub mod context;
pub mod engine;
pub mod error_code;
pub mod hook;
pub mod hooks;
pub mod report;
pub mod value_type;

#[cfg(test)]
pub(crate) mod test_support;

pub use context::ValidationContext;
pub use engine::{remove_invalid_objects, ValidationEngine};
pub use error_code::TrackerErrorCode;
pub use hook::ValidationHook;
pub use hooks::default_hooks;
pub use report::{TrackerError, ValidationReport};
pub use value_type::{data_value_is_valid, is_valid_uid};
