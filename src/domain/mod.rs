// ==========================================
// Tracker 导入管道 - 领域模型层
// ==========================================
// 职责: 导入对象、元数据、标识方案、导入结果等领域类型
// 红线: 不含校验逻辑，不含预热/解析逻辑
// ==========================================

pub mod identifiers;
pub mod import;
pub mod metadata;
pub mod repeatable_stage;
pub mod tracker;
pub mod types;

// 重导出核心类型
pub use identifiers::{TrackerIdScheme, TrackerIdentifier, TrackerIdentifierParams};
pub use import::{PersistSummary, TrackerImportReport, TypeStats};
pub use metadata::{
    CategoryCombo, CategoryOption, CategoryOptionCombo, DataElement, FileResource,
    IdentifiableObject, LegendSet, MetadataKind, OptionSet, OrganisationUnit, Program,
    ProgramIndicator, ProgramInstance, ProgramStage, ProgramStageInstance, RelationshipConstraint,
    RelationshipType, TrackedEntityAttribute, TrackedEntityInstance, TrackedEntityType,
    TrackedEntityTypeAttribute,
};
pub use repeatable_stage::{RepeatableStageParams, COUNT_ALL};
pub use tracker::{
    Attribute, DataValue, Enrollment, Event, Relationship, RelationshipItem, TrackedEntity,
    TrackerBundle, TrackerDto,
};
pub use types::{AtomicMode, ImportStatus, ProgramType, RelationshipEntity, TrackerType, ValueType};
