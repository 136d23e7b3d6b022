// ==========================================
// Tracker 导入管道 - 领域类型定义
// ==========================================
// 职责: Tracker 类型标签、值类型、关系实体类型、导入模式等枚举
// 红线: 只放无状态枚举，不含解析/校验逻辑
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// Tracker 类型 (Tracker Type)
// ==========================================
// 导入批次中四类对象的类型标签
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrackerType {
    TrackedEntity, // 跟踪实体
    Enrollment,    // 登记
    Event,         // 事件
    Relationship,  // 关系
}

impl TrackerType {
    /// 类型名称（用于错误参数，如 "event"）
    pub fn name(&self) -> &'static str {
        match self {
            TrackerType::TrackedEntity => "trackedEntity",
            TrackerType::Enrollment => "enrollment",
            TrackerType::Event => "event",
            TrackerType::Relationship => "relationship",
        }
    }
}

impl fmt::Display for TrackerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackerType::TrackedEntity => write!(f, "TRACKED_ENTITY"),
            TrackerType::Enrollment => write!(f, "ENROLLMENT"),
            TrackerType::Event => write!(f, "EVENT"),
            TrackerType::Relationship => write!(f, "RELATIONSHIP"),
        }
    }
}

// ==========================================
// 关系约束实体 (Relationship Entity)
// ==========================================
// 关系类型约束声明的一端实体种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationshipEntity {
    TrackedEntityInstance,
    ProgramInstance,
    ProgramStageInstance,
}

impl RelationshipEntity {
    /// 约束实体对应的 Tracker 类型
    pub fn tracker_type(&self) -> TrackerType {
        match self {
            RelationshipEntity::TrackedEntityInstance => TrackerType::TrackedEntity,
            RelationshipEntity::ProgramInstance => TrackerType::Enrollment,
            RelationshipEntity::ProgramStageInstance => TrackerType::Event,
        }
    }
}

impl fmt::Display for RelationshipEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelationshipEntity::TrackedEntityInstance => write!(f, "TRACKED_ENTITY_INSTANCE"),
            RelationshipEntity::ProgramInstance => write!(f, "PROGRAM_INSTANCE"),
            RelationshipEntity::ProgramStageInstance => write!(f, "PROGRAM_STAGE_INSTANCE"),
        }
    }
}

// ==========================================
// 项目类型 (Program Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProgramType {
    WithRegistration,    // 需登记（Tracker 项目）
    WithoutRegistration, // 无登记（事件项目）
}

// ==========================================
// 值类型 (Value Type)
// ==========================================
// 属性/数据元声明的值类型，用于内容校验
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValueType {
    Text,
    LongText,
    Letter,
    PhoneNumber,
    Email,
    Boolean,
    TrueOnly,
    Date,
    Datetime,
    Time,
    Number,
    UnitInterval,
    Percentage,
    Integer,
    IntegerPositive,
    IntegerNegative,
    IntegerZeroOrPositive,
    TrackerAssociate,
    Username,
    Coordinate,
    OrganisationUnit,
    Age,
    Url,
    File,
    Image,
}

impl ValueType {
    /// 是否为文件类值（值为文件资源 uid）
    pub fn is_file(&self) -> bool {
        matches!(self, ValueType::File | ValueType::Image)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            ValueType::Number
                | ValueType::UnitInterval
                | ValueType::Percentage
                | ValueType::Integer
                | ValueType::IntegerPositive
                | ValueType::IntegerNegative
                | ValueType::IntegerZeroOrPositive
        )
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 与序列化格式保持一致
        let name = serde_json::to_value(self)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_else(|| format!("{:?}", self));
        write!(f, "{}", name)
    }
}

// ==========================================
// 原子模式 (Atomic Mode)
// ==========================================
// ALL: 批次内任一错误 → 整批不落库
// OBJECT: 仅剔除被判无效的对象
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AtomicMode {
    All,
    #[default]
    Object,
}

impl fmt::Display for AtomicMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AtomicMode::All => write!(f, "ALL"),
            AtomicMode::Object => write!(f, "OBJECT"),
        }
    }
}

impl AtomicMode {
    /// 从字符串解析（未知值回落 OBJECT）
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "ALL" => AtomicMode::All,
            _ => AtomicMode::Object,
        }
    }
}

// ==========================================
// 导入状态 (Import Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImportStatus {
    Ok,      // 无错误
    Warning, // 有错误但部分对象已落库
    Error,   // 无对象落库
}

impl fmt::Display for ImportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportStatus::Ok => write!(f, "OK"),
            ImportStatus::Warning => write!(f, "WARNING"),
            ImportStatus::Error => write!(f, "ERROR"),
        }
    }
}
