// ==========================================
// Tracker 导入管道 - 引用解析器
// ==========================================
// 职责: 将批次内的原始标识解析为元数据或已存在对象
// 顺序: 先查预热存储，再查同批次内尚未落库的对象（前向引用）
// 区分: 标识缺省（走默认/回退路径） vs 标识给出但无法解析（校验错误）
// ==========================================

use crate::domain::metadata::{
    CategoryOption, CategoryOptionCombo, OrganisationUnit, Program, ProgramStage,
    RelationshipType, TrackedEntityAttribute, TrackedEntityType,
};
use crate::domain::tracker::{non_blank, RelationshipItem, TrackerBundle};
use crate::domain::types::TrackerType;
use crate::preheat::{PreheatObject, TrackerPreheat};
use std::collections::HashMap;
use std::sync::Arc;

// ==========================================
// Reference - 单个引用的解析结果
// ==========================================
#[derive(Debug, Clone)]
pub enum Reference<T> {
    Omitted,             // 未给出标识
    Resolved(Arc<T>),    // 已解析
    Unresolved(String), // 给出但无法解析
}

impl<T> Reference<T> {
    /// 未解析时写入错误参数的值: 缺省为 "null"，否则为给出的原始标识
    pub fn missing_arg(&self) -> Option<&str> {
        match self {
            Reference::Resolved(_) => None,
            Reference::Omitted => Some("null"),
            Reference::Unresolved(id) => Some(id),
        }
    }
}

// ==========================================
// BatchIndex - 批次内对象索引
// ==========================================
// 记录批次中每个对象的关键引用，供前向引用解析
#[derive(Debug, Default, Clone)]
pub struct BatchIndex {
    tracked_entities: HashMap<String, String>, // uid → 跟踪实体类型标识
    enrollments: HashMap<String, String>,      // uid → 项目标识
    events: HashMap<String, String>,           // uid → 项目阶段标识
    occurrences: HashMap<(TrackerType, String), usize>,
}

impl BatchIndex {
    pub fn from_bundle(bundle: &TrackerBundle) -> Self {
        let mut index = Self::default();

        for te in &bundle.tracked_entities {
            index
                .tracked_entities
                .entry(te.tracked_entity.clone())
                .or_insert_with(|| te.tracked_entity_type.clone());
            index.count(TrackerType::TrackedEntity, &te.tracked_entity);
        }
        for en in &bundle.enrollments {
            index
                .enrollments
                .entry(en.enrollment.clone())
                .or_insert_with(|| en.program.clone());
            index.count(TrackerType::Enrollment, &en.enrollment);
        }
        for ev in &bundle.events {
            index
                .events
                .entry(ev.event.clone())
                .or_insert_with(|| ev.program_stage.clone());
            index.count(TrackerType::Event, &ev.event);
        }
        for rel in &bundle.relationships {
            index.count(TrackerType::Relationship, &rel.relationship);
        }

        index
    }

    fn count(&mut self, tracker_type: TrackerType, uid: &str) {
        *self
            .occurrences
            .entry((tracker_type, uid.to_string()))
            .or_insert(0) += 1;
    }

    /// 同类型同 uid 在批次中的出现次数
    pub fn occurrences(&self, tracker_type: TrackerType, uid: &str) -> usize {
        self.occurrences
            .get(&(tracker_type, uid.to_string()))
            .copied()
            .unwrap_or(0)
    }
}

// ==========================================
// ReferenceResolver - 引用解析器
// ==========================================
pub struct ReferenceResolver<'a> {
    preheat: &'a TrackerPreheat,
    batch: &'a BatchIndex,
}

impl<'a> ReferenceResolver<'a> {
    pub fn new(preheat: &'a TrackerPreheat, batch: &'a BatchIndex) -> Self {
        Self { preheat, batch }
    }

    pub fn preheat(&self) -> &'a TrackerPreheat {
        self.preheat
    }

    pub fn batch(&self) -> &'a BatchIndex {
        self.batch
    }

    /// 解析可选标识
    pub fn resolve<T: PreheatObject>(&self, id: Option<&str>) -> Reference<T> {
        match non_blank(id) {
            None => Reference::Omitted,
            Some(id) => match self.preheat.get::<T>(id) {
                Some(object) => Reference::Resolved(object),
                None => Reference::Unresolved(id.to_string()),
            },
        }
    }

    // ===== 元数据 =====

    pub fn organisation_unit(&self, id: &str) -> Option<Arc<OrganisationUnit>> {
        self.preheat.get_organisation_unit(id)
    }

    pub fn program(&self, id: &str) -> Option<Arc<Program>> {
        self.preheat.get::<Program>(id)
    }

    pub fn program_stage(&self, id: &str) -> Option<Arc<ProgramStage>> {
        self.preheat.get::<ProgramStage>(id)
    }

    pub fn tracked_entity_type(&self, id: &str) -> Option<Arc<TrackedEntityType>> {
        self.preheat.get::<TrackedEntityType>(id)
    }

    pub fn tracked_entity_attribute(&self, id: &str) -> Option<Arc<TrackedEntityAttribute>> {
        self.preheat.get::<TrackedEntityAttribute>(id)
    }

    pub fn relationship_type(&self, id: &str) -> Option<Arc<RelationshipType>> {
        self.preheat.get::<RelationshipType>(id)
    }

    pub fn category_option(&self, id: &str) -> Option<Arc<CategoryOption>> {
        self.preheat.get::<CategoryOption>(id)
    }

    pub fn category_option_combo(&self, id: &str) -> Option<Arc<CategoryOptionCombo>> {
        self.preheat.get_category_option_combo(id)
    }

    // ===== 已存在或同批次对象 =====

    pub fn tracked_entity_exists(&self, uid: &str) -> bool {
        self.preheat.get_tracked_entity(uid).is_some()
            || self.batch.tracked_entities.contains_key(uid)
    }

    pub fn enrollment_exists(&self, uid: &str) -> bool {
        self.preheat.get_enrollment(uid).is_some() || self.batch.enrollments.contains_key(uid)
    }

    pub fn event_exists(&self, uid: &str) -> bool {
        self.preheat.get_event(uid).is_some() || self.batch.events.contains_key(uid)
    }

    /// 关系端点是否存在
    pub fn item_exists(&self, item: &RelationshipItem) -> bool {
        match item {
            RelationshipItem::TrackedEntity(uid) => self.tracked_entity_exists(uid),
            RelationshipItem::Enrollment(uid) => self.enrollment_exists(uid),
            RelationshipItem::Event(uid) => self.event_exists(uid),
        }
    }

    /// 跟踪实体的类型 uid（已存在对象优先，其次批次内对象）
    pub fn tracked_entity_type_of(&self, te_uid: &str) -> Option<String> {
        if let Some(tei) = self.preheat.get_tracked_entity(te_uid) {
            return Some(tei.tracked_entity_type.clone());
        }
        self.batch.tracked_entities.get(te_uid).map(|tet_id| {
            self.tracked_entity_type(tet_id)
                .map(|tet| tet.uid.clone())
                .unwrap_or_else(|| tet_id.clone())
        })
    }

    /// 登记所属项目 uid（已存在对象优先，其次批次内对象）
    pub fn enrollment_program_of(&self, enrollment_uid: &str) -> Option<String> {
        if let Some(pi) = self.preheat.get_enrollment(enrollment_uid) {
            return Some(pi.program.clone());
        }
        self.batch.enrollments.get(enrollment_uid).map(|program_id| {
            self.program(program_id)
                .map(|p| p.uid.clone())
                .unwrap_or_else(|| program_id.clone())
        })
    }
}
