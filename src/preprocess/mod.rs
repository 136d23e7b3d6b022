// ==========================================
// Tracker 导入管道 - 批次预处理
// ==========================================
// 职责: 预热之后、校验之前对批次做结构性整理
// ==========================================

pub mod duplicate_relationships;

pub use duplicate_relationships::DuplicateRelationshipsPreProcessor;

use crate::config::ValidationSettings;
use crate::domain::tracker::TrackerBundle;
use crate::preheat::TrackerPreheat;

// ==========================================
// BundlePreProcessor Trait
// ==========================================
pub trait BundlePreProcessor: Send + Sync {
    fn name(&self) -> &'static str;

    /// 按本次导入设置判断是否执行
    fn enabled(&self, _settings: &ValidationSettings) -> bool {
        true
    }

    /// 处理批次
    ///
    /// # 返回
    /// - 被移除的对象数
    fn process(&self, bundle: &mut TrackerBundle, preheat: &TrackerPreheat) -> usize;
}
