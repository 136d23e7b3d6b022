// ==========================================
// Mock 配置读取器
// ==========================================
// 用于集成测试，可按需调整各项设置
// ==========================================

use async_trait::async_trait;
use tracker_import::config::{EncryptionStatus, TrackerConfigReader};
use tracker_import::domain::TrackerIdentifierParams;
use tracker_import::{AtomicMode, TrackerImportResult};

pub struct MockConfig {
    pub atomic_mode: AtomicMode,
    pub encryption_status: EncryptionStatus,
    pub max_attribute_value_length: usize,
    pub identifiers: TrackerIdentifierParams,
    pub preprocess_duplicate_relationships: bool,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            atomic_mode: AtomicMode::Object,
            encryption_status: EncryptionStatus::Ok,
            max_attribute_value_length: 1200,
            identifiers: TrackerIdentifierParams::default(),
            preprocess_duplicate_relationships: true,
        }
    }
}

impl MockConfig {
    pub fn atomic_all() -> Self {
        Self {
            atomic_mode: AtomicMode::All,
            ..Default::default()
        }
    }

    pub fn with_max_length(max_attribute_value_length: usize) -> Self {
        Self {
            max_attribute_value_length,
            ..Default::default()
        }
    }
}

#[async_trait]
impl TrackerConfigReader for MockConfig {
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
