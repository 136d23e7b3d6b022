// ==========================================
// Tracker 导入管道 - 校验设置快照
// ==========================================
// 职责: 导入开始前读取一次的只读设置（校验期间不再变化）
// ==========================================

use crate::config::tracker_config_trait::TrackerConfigReader;
use crate::domain::identifiers::TrackerIdentifierParams;
use crate::domain::types::AtomicMode;
use crate::importer::error::{TrackerImportError, TrackerImportResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 属性值最大长度默认值
pub const DEFAULT_MAX_ATTRIBUTE_VALUE_LENGTH: usize = 1200;

// ==========================================
// EncryptionStatus - 加密可用状态
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EncryptionStatus {
    #[default]
    Ok,
    MissingEncryptionPassword,
    EncryptionPasswordTooShort,
}

impl EncryptionStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, EncryptionStatus::Ok)
    }
}

impl fmt::Display for EncryptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EncryptionStatus::Ok => "OK",
            EncryptionStatus::MissingEncryptionPassword => "MISSING_ENCRYPTION_PASSWORD",
            EncryptionStatus::EncryptionPasswordTooShort => "ENCRYPTION_PASSWORD_TOO_SHORT",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for EncryptionStatus {
    type Err = TrackerImportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "OK" => Ok(EncryptionStatus::Ok),
            "MISSING_ENCRYPTION_PASSWORD" => Ok(EncryptionStatus::MissingEncryptionPassword),
            "ENCRYPTION_PASSWORD_TOO_SHORT" => Ok(EncryptionStatus::EncryptionPasswordTooShort),
            other => Err(TrackerImportError::ConfigValueError {
                key: "encryption_status".to_string(),
                value: other.to_string(),
                message: "未知加密状态".to_string(),
            }),
        }
    }
}

// ==========================================
// ValidationSettings - 设置快照
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValidationSettings {
    pub atomic_mode: AtomicMode,
    pub encryption_status: EncryptionStatus,
    pub max_attribute_value_length: usize,
    pub identifiers: TrackerIdentifierParams,
    pub preprocess_duplicate_relationships: bool,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            atomic_mode: AtomicMode::Object,
            encryption_status: EncryptionStatus::Ok,
            max_attribute_value_length: DEFAULT_MAX_ATTRIBUTE_VALUE_LENGTH,
            identifiers: TrackerIdentifierParams::default(),
            preprocess_duplicate_relationships: true,
        }
    }
}

impl ValidationSettings {
    /// 从配置读取器加载完整快照
    pub async fn load<C: TrackerConfigReader + ?Sized>(reader: &C) -> TrackerImportResult<Self> {
        Ok(Self {
            atomic_mode: reader.get_atomic_mode().await?,
            encryption_status: reader.get_encryption_status().await?,
            max_attribute_value_length: reader.get_max_attribute_value_length().await?,
            identifiers: reader.get_identifier_params().await?,
            preprocess_duplicate_relationships: reader
                .get_preprocess_duplicate_relationships()
                .await?,
        })
    }
}

// 内存快照本身也可作为配置来源（测试与 CLI 无库场景）
#[async_trait]
impl TrackerConfigReader for ValidationSettings {
    async fn get_atomic_mode(&self) -> TrackerImportResult<AtomicMode> {
        Ok(self.atomic_mode)
    }

    async fn get_encryption_status(&self) -> TrackerImportResult<EncryptionStatus> {
        Ok(self.encryption_status)
    }

    async fn get_max_attribute_value_length(&self) -> TrackerImportResult<usize> {
        Ok(self.max_attribute_value_length)
    }

    async fn get_identifier_params(&self) -> TrackerImportResult<TrackerIdentifierParams> {
        Ok(self.identifiers.clone())
    }

    async fn get_preprocess_duplicate_relationships(&self) -> TrackerImportResult<bool> {
        Ok(self.preprocess_duplicate_relationships)
    }
}
