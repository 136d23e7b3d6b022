// ==========================================
// Tracker 导入管道 - 校验钩子集合
// ==========================================
// 执行顺序固定: uid 预检 → 元数据预检 → 数据关系预检 → 关系约束 → 属性内容
// ==========================================

pub mod pre_check_data_relations;
pub mod pre_check_meta;
pub mod pre_check_uid;
pub mod relationships;
pub mod tracked_entity_attribute;

pub use pre_check_data_relations::PreCheckDataRelationsValidationHook;
pub use pre_check_meta::PreCheckMetaValidationHook;
pub use pre_check_uid::PreCheckUidValidationHook;
pub use relationships::RelationshipsValidationHook;
pub use tracked_entity_attribute::TrackedEntityAttributeValidationHook;

use crate::validation::hook::ValidationHook;

/// 默认钩子链（按执行顺序）
pub fn default_hooks() -> Vec<Box<dyn ValidationHook>> {
    vec![
        Box::new(PreCheckUidValidationHook),
        Box::new(PreCheckMetaValidationHook),
        Box::new(PreCheckDataRelationsValidationHook),
        Box::new(RelationshipsValidationHook),
        Box::new(TrackedEntityAttributeValidationHook),
    ]
}
