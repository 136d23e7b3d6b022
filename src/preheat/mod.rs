// ==========================================
// Tracker 导入管道 - 预热层
// ==========================================
// 职责: 导入前一次性加载引用到的元数据与已持久化对象
// 红线: 预热完成前不得运行任何校验器
// ==========================================

pub mod snapshot;
pub mod store;

pub use snapshot::{
    InMemorySnapshotProvider, JsonFileSnapshotProvider, PreheatSnapshot, PreheatSnapshotProvider,
};
pub use store::{PreheatEntry, PreheatObject, TrackerPreheat};
