// ==========================================
// Tracker 导入管道 - 导入 Trait
// ==========================================
// 职责: 定义导入主接口与落库协作方接口（不包含实现）
// ==========================================

use crate::domain::import::{PersistSummary, TrackerImportReport};
use crate::domain::tracker::TrackerBundle;
use crate::importer::error::TrackerImportResult;
use async_trait::async_trait;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

// ==========================================
// TrackerImporter Trait
// ==========================================
// 用途: 导入主接口
// 实现者: TrackerImporterImpl
#[async_trait]
pub trait TrackerImporter: Send + Sync {
    /// 导入单个批次
    ///
    /// # 返回
    /// - Ok(TrackerImportReport): 导入报告（对象级问题在校验报告中）
    /// - Err: 配置读取、预热拉取、落库等协作方失败
    ///
    /// # 导入流程
    /// 1. 读取校验设置
    /// 2. 预热
    /// 3. 批次预处理
    /// 4. 校验
    /// 5. 按原子模式过滤
    /// 6. 落库
    /// 7. 生成报告
    async fn import(&self, bundle: TrackerBundle) -> TrackerImportResult<TrackerImportReport> {
        self.import_with_cancel(bundle, Arc::new(AtomicBool::new(false)))
            .await
    }

    /// 导入单个批次，调用方持有本次导入的取消标志
    ///
    /// # 说明
    /// - 标志只作用于这一次导入
    /// - 置位后校验停止迭代，返回 Err(Cancelled)，不落库
    async fn import_with_cancel(
        &self,
        bundle: TrackerBundle,
        cancelled: Arc<AtomicBool>,
    ) -> TrackerImportResult<TrackerImportReport>;

    /// 并发导入多个批次
    ///
    /// # 说明
    /// - 每个批次独立预热、独立校验、独立取消，互不影响
    /// - 某个批次失败不影响其他批次
    async fn batch_import(
        &self,
        bundles: Vec<TrackerBundle>,
    ) -> TrackerImportResult<Vec<Result<TrackerImportReport, String>>>;
}

// ==========================================
// TrackerBundlePersister Trait
// ==========================================
// 用途: 落库协作方，只接收通过校验的对象
// 实现者: JsonFileBundlePersister, InMemoryBundlePersister
#[async_trait]
pub trait TrackerBundlePersister: Send + Sync {
    /// 持久化过滤后的批次
    ///
    /// # 返回
    /// - PersistSummary: 各类型实际写入数量
    async fn persist(&self, bundle: &TrackerBundle) -> TrackerImportResult<PersistSummary>;
}
