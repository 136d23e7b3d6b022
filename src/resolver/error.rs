// ==========================================
// Tracker 导入管道 - 非法查询错误
// ==========================================
// 职责: 维度表达式 / 查询项定位失败（配置类错误，直接失败，不进校验报告）
// ==========================================

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IllegalQueryError {
    #[error("E7224: Item identifier does not reference any data element, attribute or indicator part of the program: `{item}`")]
    ItemNotFound { item: String },

    #[error("E7225: Program stage is mandatory for data element dimensions in enrollment analytics queries: `{item}`")]
    DataElementWithoutStage { item: String },

    #[error("E7226: Dimension is not a valid query item: `{dimension}`")]
    InvalidDimension { dimension: String },

    #[error("E7227: Repeatable stage parameters are invalid: `{dimension}`")]
    InvalidRepeatableStageParams { dimension: String },
}

impl IllegalQueryError {
    /// 错误码
    pub fn code(&self) -> &'static str {
        match self {
            IllegalQueryError::ItemNotFound { .. } => "E7224",
            IllegalQueryError::DataElementWithoutStage { .. } => "E7225",
            IllegalQueryError::InvalidDimension { .. } => "E7226",
            IllegalQueryError::InvalidRepeatableStageParams { .. } => "E7227",
        }
    }
}

pub type QueryResult<T> = Result<T, IllegalQueryError>;
