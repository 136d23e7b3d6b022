// ==========================================
// Tracker 导入管道 - 校验上下文
// ==========================================
// 职责: 为各校验钩子提供只读的预热存储、引用解析器、设置与 AOC 协作方
// 生命周期: 单次导入内有效
// ==========================================

use crate::config::ValidationSettings;
use crate::domain::metadata::{
    CategoryOptionCombo, OrganisationUnit, Program, ProgramStage, RelationshipType,
    TrackedEntityAttribute, TrackedEntityType,
};
use crate::preheat::TrackerPreheat;
use crate::resolver::{
    AttributeOptionComboCache, AttributeOptionComboResolver, BatchIndex, CategoryService,
    ReferenceResolver,
};
use std::sync::Arc;

pub struct ValidationContext<'a> {
    preheat: &'a TrackerPreheat,
    resolver: ReferenceResolver<'a>,
    settings: &'a ValidationSettings,
    category_service: &'a dyn CategoryService,
    aoc_cache: &'a AttributeOptionComboCache,
}

impl<'a> ValidationContext<'a> {
    pub fn new(
        preheat: &'a TrackerPreheat,
        batch: &'a BatchIndex,
        settings: &'a ValidationSettings,
        category_service: &'a dyn CategoryService,
        aoc_cache: &'a AttributeOptionComboCache,
    ) -> Self {
        Self {
            preheat,
            resolver: ReferenceResolver::new(preheat, batch),
            settings,
            category_service,
            aoc_cache,
        }
    }

    pub fn preheat(&self) -> &'a TrackerPreheat {
        self.preheat
    }

    pub fn resolver(&self) -> &ReferenceResolver<'a> {
        &self.resolver
    }

    pub fn settings(&self) -> &'a ValidationSettings {
        self.settings
    }

    pub fn aoc_cache(&self) -> &'a AttributeOptionComboCache {
        self.aoc_cache
    }

    /// 构造本次导入共享缓存的 AOC 解析器
    pub fn aoc_resolver(&self) -> AttributeOptionComboResolver<'_> {
        AttributeOptionComboResolver::new(&self.resolver, self.category_service, self.aoc_cache)
    }

    /// 事件已解析的 AOC（数据关系钩子之后可用）
    pub fn cached_event_aoc(&self, event_uid: &str) -> Option<Arc<CategoryOptionCombo>> {
        self.aoc_cache.event_aoc(event_uid)
    }

    // ===== 元数据快捷查询 =====

    pub fn organisation_unit(&self, id: &str) -> Option<Arc<OrganisationUnit>> {
        self.resolver.organisation_unit(id)
    }

    pub fn program(&self, id: &str) -> Option<Arc<Program>> {
        self.resolver.program(id)
    }

    pub fn program_stage(&self, id: &str) -> Option<Arc<ProgramStage>> {
        self.resolver.program_stage(id)
    }

    pub fn tracked_entity_type(&self, id: &str) -> Option<Arc<TrackedEntityType>> {
        self.resolver.tracked_entity_type(id)
    }

    pub fn tracked_entity_attribute(&self, id: &str) -> Option<Arc<TrackedEntityAttribute>> {
        self.resolver.tracked_entity_attribute(id)
    }

    pub fn relationship_type(&self, id: &str) -> Option<Arc<RelationshipType>> {
        self.resolver.relationship_type(id)
    }
}
