// ==========================================
// Tracker 导入管道 - 导入配置读取 Trait
// ==========================================
// 职责: 定义导入管道所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含校验逻辑
// ==========================================

use crate::config::settings::EncryptionStatus;
use crate::domain::identifiers::TrackerIdentifierParams;
use crate::domain::types::AtomicMode;
use crate::importer::error::TrackerImportResult;
use async_trait::async_trait;

// ==========================================
// TrackerConfigReader Trait
// ==========================================
// 用途: 导入前一次性读取校验设置
// 实现者: ConfigManager（config_kv 表）、ValidationSettings（内存快照）
#[async_trait]
pub trait TrackerConfigReader: Send + Sync {
    /// 获取原子模式
    ///
    /// # 返回
    /// - AtomicMode::All: 任一错误则整批不落库
    /// - AtomicMode::Object: 仅剔除出错对象
    ///
    /// # 默认值
    /// - OBJECT
    async fn get_atomic_mode(&self) -> TrackerImportResult<AtomicMode>;

    /// 获取加密状态（机密属性需要加密可用）
    ///
    /// # 默认值
    /// - OK
    async fn get_encryption_status(&self) -> TrackerImportResult<EncryptionStatus>;

    /// 获取属性值最大长度
    ///
    /// # 默认值
    /// - 1200
    async fn get_max_attribute_value_length(&self) -> TrackerImportResult<usize>;

    /// 获取各类元数据的标识方案
    ///
    /// # 默认值
    /// - 全部 UID
    async fn get_identifier_params(&self) -> TrackerImportResult<TrackerIdentifierParams>;

    /// 是否预处理批次内重复关系
    ///
    /// # 默认值
    /// - true
    async fn get_preprocess_duplicate_relationships(&self) -> TrackerImportResult<bool>;
}
