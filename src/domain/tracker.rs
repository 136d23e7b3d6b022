// ==========================================
// Tracker 导入管道 - 导入对象模型 (Tracker DTO)
// ==========================================
// 职责: 跟踪实体/登记/事件/关系 四类待导入对象与导入批次
// 红线: 对象内的引用均为原始标识字符串，按标识方案解析，不在此处解析
// ==========================================

use crate::domain::identifiers::TrackerIdentifierParams;
use crate::domain::types::{TrackerType, ValueType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// TrackerDto Trait
// ==========================================
// 用途: 错误报告与校验引擎对四类对象的统一视图
pub trait TrackerDto {
    fn uid(&self) -> &str;

    fn tracker_type(&self) -> TrackerType;
}

// ==========================================
// Attribute / DataValue - 属性值与数据值
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Attribute {
    pub attribute: String,             // 跟踪属性标识
    pub value: Option<String>,         // None = 显式置空
    pub value_type: Option<ValueType>, // 载荷声明的值类型（可缺省）
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DataValue {
    pub data_element: String,
    pub value: Option<String>,
}

// ==========================================
// TrackedEntity - 跟踪实体
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrackedEntity {
    pub tracked_entity: String,
    pub tracked_entity_type: String,
    pub org_unit: String,
    pub inactive: bool,
    pub deleted: bool,
    pub attributes: Vec<Attribute>,
}

impl TrackerDto for TrackedEntity {
    fn uid(&self) -> &str {
        &self.tracked_entity
    }

    fn tracker_type(&self) -> TrackerType {
        TrackerType::TrackedEntity
    }
}

// ==========================================
// Enrollment - 登记
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Enrollment {
    pub enrollment: String,
    pub tracked_entity: String,
    pub program: String,
    pub org_unit: String,
    pub enrolled_at: Option<DateTime<Utc>>,
    pub occurred_at: Option<DateTime<Utc>>,
    pub status: Option<String>,
    pub attributes: Vec<Attribute>,
}

impl TrackerDto for Enrollment {
    fn uid(&self) -> &str {
        &self.enrollment
    }

    fn tracker_type(&self) -> TrackerType {
        TrackerType::Enrollment
    }
}

// ==========================================
// Event - 事件
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Event {
    pub event: String,
    pub enrollment: Option<String>,
    pub program: String,
    pub program_stage: String,
    pub org_unit: String,
    pub occurred_at: Option<DateTime<Utc>>,
    pub attribute_option_combo: Option<String>,
    pub attribute_category_options: Option<String>, // 以 ';' 分隔的类别选项标识
    pub data_values: Vec<DataValue>,
}

impl Event {
    /// 显式给出的 AOC（空白视为缺省）
    pub fn attribute_option_combo_id(&self) -> Option<&str> {
        non_blank(self.attribute_option_combo.as_deref())
    }

    /// 显式给出的类别选项字符串（去首尾空白，空白视为缺省）
    pub fn attribute_category_options_str(&self) -> Option<&str> {
        non_blank(self.attribute_category_options.as_deref()).map(str::trim)
    }

    /// 拆分类别选项标识（';' 分隔，去重，保序）
    pub fn category_option_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = Vec::new();
        if let Some(cos) = self.attribute_category_options_str() {
            for id in cos.split(';').map(str::trim).filter(|s| !s.is_empty()) {
                if !ids.iter().any(|existing| existing == id) {
                    ids.push(id.to_string());
                }
            }
        }
        ids
    }

    pub fn enrollment_id(&self) -> Option<&str> {
        non_blank(self.enrollment.as_deref())
    }
}

impl TrackerDto for Event {
    fn uid(&self) -> &str {
        &self.event
    }

    fn tracker_type(&self) -> TrackerType {
        TrackerType::Event
    }
}

// ==========================================
// RelationshipItem - 关系端点
// ==========================================
// 三选一: 跟踪实体 / 登记 / 事件
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationshipItem {
    TrackedEntity(String),
    Enrollment(String),
    Event(String),
}

impl RelationshipItem {
    pub fn tracker_type(&self) -> TrackerType {
        match self {
            RelationshipItem::TrackedEntity(_) => TrackerType::TrackedEntity,
            RelationshipItem::Enrollment(_) => TrackerType::Enrollment,
            RelationshipItem::Event(_) => TrackerType::Event,
        }
    }

    pub fn uid(&self) -> &str {
        match self {
            RelationshipItem::TrackedEntity(uid)
            | RelationshipItem::Enrollment(uid)
            | RelationshipItem::Event(uid) => uid,
        }
    }
}

// ==========================================
// Relationship - 关系
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub relationship: String,
    #[serde(default)]
    pub relationship_type: Option<String>,
    pub from: RelationshipItem,
    pub to: RelationshipItem,
    #[serde(default)]
    pub bidirectional: bool,
}

impl Relationship {
    pub fn relationship_type_id(&self) -> Option<&str> {
        non_blank(self.relationship_type.as_deref())
    }
}

impl TrackerDto for Relationship {
    fn uid(&self) -> &str {
        &self.relationship
    }

    fn tracker_type(&self) -> TrackerType {
        TrackerType::Relationship
    }
}

// ==========================================
// TrackerBundle - 导入批次
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrackerBundle {
    pub tracked_entities: Vec<TrackedEntity>,
    pub enrollments: Vec<Enrollment>,
    pub events: Vec<Event>,
    pub relationships: Vec<Relationship>,
    pub identifiers: TrackerIdentifierParams,
}

impl TrackerBundle {
    /// 批次对象总数
    pub fn object_count(&self) -> usize {
        self.tracked_entities.len()
            + self.enrollments.len()
            + self.events.len()
            + self.relationships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.object_count() == 0
    }

    pub fn tracked_entity(&self, uid: &str) -> Option<&TrackedEntity> {
        self.tracked_entities.iter().find(|te| te.tracked_entity == uid)
    }

    pub fn enrollment(&self, uid: &str) -> Option<&Enrollment> {
        self.enrollments.iter().find(|en| en.enrollment == uid)
    }
}

/// 空白字符串视为缺省
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
