// ==========================================
// Tracker 导入管道 - 元数据与已持久化对象模型
// ==========================================
// 职责: 预热快照中的只读元数据（组织机构/项目/阶段/类别组合等）
//       以及数据库中已存在的跟踪实体/登记/事件
// 红线: 元数据内部互相引用一律使用 uid，不随标识方案变化
// ==========================================

use crate::domain::types::{ProgramType, RelationshipEntity, ValueType};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

// ==========================================
// 元数据种类 (Metadata Kind)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MetadataKind {
    OrganisationUnit,
    Program,
    ProgramStage,
    TrackedEntityType,
    TrackedEntityAttribute,
    CategoryOption,
    CategoryCombo,
    CategoryOptionCombo,
    RelationshipType,
    DataElement,
    ProgramIndicator,
    LegendSet,
}

impl fmt::Display for MetadataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

// ==========================================
// IdentifiableObject Trait
// ==========================================
// 用途: 标识方案（UID/CODE/NAME/ATTRIBUTE）取值
pub trait IdentifiableObject {
    fn uid(&self) -> &str;

    fn code(&self) -> Option<&str>;

    fn name(&self) -> &str;

    /// 取元数据属性值（ATTRIBUTE 标识方案）
    fn attribute_value(&self, attribute_uid: &str) -> Option<&str>;
}

macro_rules! impl_identifiable {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IdentifiableObject for $ty {
                fn uid(&self) -> &str {
                    &self.uid
                }

                fn code(&self) -> Option<&str> {
                    self.code.as_deref()
                }

                fn name(&self) -> &str {
                    &self.name
                }

                fn attribute_value(&self, attribute_uid: &str) -> Option<&str> {
                    self.attribute_values.get(attribute_uid).map(String::as_str)
                }
            }
        )*
    };
}

// ==========================================
// OrganisationUnit - 组织机构
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrganisationUnit {
    pub uid: String,
    pub code: Option<String>,
    pub name: String,
    pub attribute_values: HashMap<String, String>,
    pub path: Option<String>, // 层级路径 /A/B/C
}

// ==========================================
// Program - 项目
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    pub uid: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub attribute_values: HashMap<String, String>,
    pub program_type: ProgramType,
    pub category_combo: String, // 类别组合 uid
    #[serde(default)]
    pub tracked_entity_type: Option<String>,
    #[serde(default)]
    pub program_stages: Vec<String>,
    #[serde(default)]
    pub organisation_units: Vec<String>, // 已分配组织机构 uid
    #[serde(default)]
    pub attributes: Vec<String>, // 项目跟踪属性 uid
    #[serde(default)]
    pub program_indicators: Vec<String>,
}

impl Program {
    /// 是否为需登记项目
    pub fn is_registration(&self) -> bool {
        self.program_type == ProgramType::WithRegistration
    }

    pub fn has_organisation_unit(&self, org_unit_uid: &str) -> bool {
        self.organisation_units.iter().any(|ou| ou == org_unit_uid)
    }
}

// ==========================================
// ProgramStage - 项目阶段
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgramStage {
    pub uid: String,
    pub code: Option<String>,
    pub name: String,
    pub attribute_values: HashMap<String, String>,
    pub program: String, // 所属项目 uid
    pub repeatable: bool,
    pub data_elements: Vec<String>,
}

// ==========================================
// TrackedEntityType - 跟踪实体类型
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrackedEntityType {
    pub uid: String,
    pub code: Option<String>,
    pub name: String,
    pub attribute_values: HashMap<String, String>,
    pub tracked_entity_type_attributes: Vec<TrackedEntityTypeAttribute>,
}

impl TrackedEntityType {
    /// 必填属性 uid 列表
    pub fn mandatory_attributes(&self) -> impl Iterator<Item = &str> {
        self.tracked_entity_type_attributes
            .iter()
            .filter(|a| a.mandatory)
            .map(|a| a.tracked_entity_attribute.as_str())
    }

    pub fn is_mandatory(&self, attribute_uid: &str) -> bool {
        self.mandatory_attributes().any(|uid| uid == attribute_uid)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrackedEntityTypeAttribute {
    pub tracked_entity_attribute: String,
    pub mandatory: bool,
}

// ==========================================
// TrackedEntityAttribute - 跟踪属性
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedEntityAttribute {
    pub uid: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub attribute_values: HashMap<String, String>,
    pub value_type: ValueType,
    #[serde(default)]
    pub confidential: bool,
    #[serde(default)]
    pub option_set: Option<OptionSet>,
}

// 选项集（仅需选项代码）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OptionSet {
    pub uid: String,
    pub options: Vec<String>,
}

impl OptionSet {
    pub fn contains(&self, code: &str) -> bool {
        self.options.iter().any(|o| o == code)
    }
}

// ==========================================
// 类别体系: CategoryOption / CategoryCombo / CategoryOptionCombo
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CategoryOption {
    pub uid: String,
    pub code: Option<String>,
    pub name: String,
    pub attribute_values: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CategoryCombo {
    pub uid: String,
    pub code: Option<String>,
    pub name: String,
    pub attribute_values: HashMap<String, String>,
    pub is_default: bool,
    pub category_options: Vec<String>, // 组成该组合的全部类别选项 uid
}

impl CategoryCombo {
    pub fn contains_all(&self, option_uids: &BTreeSet<String>) -> bool {
        option_uids
            .iter()
            .all(|uid| self.category_options.iter().any(|co| co == uid))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CategoryOptionCombo {
    pub uid: String,
    pub code: Option<String>,
    pub name: String,
    pub attribute_values: HashMap<String, String>,
    pub category_combo: String, // 所属类别组合 uid
    pub category_options: Vec<String>,
}

impl CategoryOptionCombo {
    /// 类别选项集合（按成员比较）
    pub fn option_set(&self) -> BTreeSet<String> {
        self.category_options.iter().cloned().collect()
    }

    /// 选项集合是否与给定集合完全一致
    pub fn matches_options(&self, option_uids: &BTreeSet<String>) -> bool {
        self.option_set() == *option_uids
    }
}

// ==========================================
// RelationshipType / RelationshipConstraint - 关系类型与约束
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipType {
    pub uid: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub attribute_values: HashMap<String, String>,
    #[serde(default)]
    pub bidirectional: bool,
    pub from_constraint: RelationshipConstraint,
    pub to_constraint: RelationshipConstraint,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipConstraint {
    pub relationship_entity: RelationshipEntity,
    #[serde(default)]
    pub tracked_entity_type: Option<String>,
    #[serde(default)]
    pub program: Option<String>,
    #[serde(default)]
    pub program_stage: Option<String>,
    #[serde(default)]
    pub tracked_entity_attributes: Vec<String>,
}

impl RelationshipConstraint {
    pub fn of(relationship_entity: RelationshipEntity) -> Self {
        Self {
            relationship_entity,
            tracked_entity_type: None,
            program: None,
            program_stage: None,
            tracked_entity_attributes: Vec::new(),
        }
    }
}

// ==========================================
// 分析维度相关: DataElement / ProgramIndicator / LegendSet
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataElement {
    pub uid: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub attribute_values: HashMap<String, String>,
    pub value_type: ValueType,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgramIndicator {
    pub uid: String,
    pub code: Option<String>,
    pub name: String,
    pub attribute_values: HashMap<String, String>,
    pub program: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegendSet {
    pub uid: String,
    pub code: Option<String>,
    pub name: String,
    pub attribute_values: HashMap<String, String>,
}

impl_identifiable!(
    OrganisationUnit,
    Program,
    ProgramStage,
    TrackedEntityType,
    TrackedEntityAttribute,
    CategoryOption,
    CategoryCombo,
    CategoryOptionCombo,
    RelationshipType,
    DataElement,
    ProgramIndicator,
    LegendSet,
);

// ==========================================
// 已持久化对象（预热时从库中读出）
// ==========================================

/// 已存在的跟踪实体
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrackedEntityInstance {
    pub uid: String,
    pub tracked_entity_type: String,
    pub org_unit: String,
    pub attribute_values: HashMap<String, String>, // 属性 uid → 值
}

/// 已存在的登记
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgramInstance {
    pub uid: String,
    pub program: String,
    pub tracked_entity: String,
    pub org_unit: String,
}

/// 已存在的事件
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgramStageInstance {
    pub uid: String,
    pub program_stage: String,
    pub enrollment: Option<String>,
    pub attribute_option_combo: Option<String>,
}

/// 文件资源
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FileResource {
    pub uid: String,
    pub assigned: bool, // 是否已被其他对象占用
}
