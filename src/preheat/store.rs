// ==========================================
// Tracker 导入管道 - 预热存储 (Preheat Store)
// ==========================================
// 职责: 单次导入的元数据与已持久化对象只读缓存
// 键: (元数据种类, 标识字符串)
// 索引: 方案标识索引只服务载荷标识；uid 索引只服务元数据之间的内部引用
// 红线: 构建完成后只读；唯一例外是校验期发现的 AOC 旁路缓存
// ==========================================

use crate::domain::identifiers::{TrackerIdentifier, TrackerIdentifierParams};
use crate::domain::metadata::{
    CategoryCombo, CategoryOption, CategoryOptionCombo, DataElement, FileResource,
    IdentifiableObject, LegendSet, MetadataKind, OrganisationUnit, Program, ProgramIndicator,
    ProgramInstance, ProgramStage, ProgramStageInstance, RelationshipType, TrackedEntityAttribute,
    TrackedEntityInstance, TrackedEntityType,
};
use crate::preheat::snapshot::PreheatSnapshot;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, warn};

// ==========================================
// PreheatEntry - 缓存条目
// ==========================================
#[derive(Debug, Clone)]
pub enum PreheatEntry {
    OrganisationUnit(Arc<OrganisationUnit>),
    Program(Arc<Program>),
    ProgramStage(Arc<ProgramStage>),
    TrackedEntityType(Arc<TrackedEntityType>),
    TrackedEntityAttribute(Arc<TrackedEntityAttribute>),
    CategoryOption(Arc<CategoryOption>),
    CategoryCombo(Arc<CategoryCombo>),
    CategoryOptionCombo(Arc<CategoryOptionCombo>),
    RelationshipType(Arc<RelationshipType>),
    DataElement(Arc<DataElement>),
    ProgramIndicator(Arc<ProgramIndicator>),
    LegendSet(Arc<LegendSet>),
}

// ==========================================
// PreheatObject Trait
// ==========================================
// 用途: 泛型 get/put，类型与缓存条目之间互转
pub trait PreheatObject: IdentifiableObject + Send + Sync + Sized + 'static {
    const KIND: MetadataKind;

    fn wrap(object: Arc<Self>) -> PreheatEntry;

    fn unwrap(entry: &PreheatEntry) -> Option<Arc<Self>>;
}

macro_rules! impl_preheat_object {
    ($($ty:ident),* $(,)?) => {
        $(
            impl PreheatObject for $ty {
                const KIND: MetadataKind = MetadataKind::$ty;

                fn wrap(object: Arc<Self>) -> PreheatEntry {
                    PreheatEntry::$ty(object)
                }

                fn unwrap(entry: &PreheatEntry) -> Option<Arc<Self>> {
                    match entry {
                        PreheatEntry::$ty(object) => Some(Arc::clone(object)),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_preheat_object!(
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
// TrackerPreheat - 预热存储
// ==========================================
#[derive(Debug, Default)]
pub struct TrackerPreheat {
    identifiers: TrackerIdentifierParams,

    // 元数据: 种类 → (方案标识 → 条目)
    metadata: HashMap<MetadataKind, HashMap<String, PreheatEntry>>,

    // 元数据: 种类 → (uid → 条目)
    uid_index: HashMap<MetadataKind, HashMap<String, PreheatEntry>>,

    // 各种类的默认对象（默认类别组合、默认 AOC）
    defaults: HashMap<MetadataKind, PreheatEntry>,

    // 已持久化对象（按 uid）
    tracked_entities: HashMap<String, Arc<TrackedEntityInstance>>,
    enrollments: HashMap<String, Arc<ProgramInstance>>,
    events: HashMap<String, Arc<ProgramStageInstance>>,
    file_resources: HashMap<String, Arc<FileResource>>,

    // 校验期发现的 AOC
    discovered_aocs: RwLock<DiscoveredAocs>,
}

#[derive(Debug, Default)]
struct DiscoveredAocs {
    by_id: HashMap<String, Arc<CategoryOptionCombo>>,
    by_uid: HashMap<String, Arc<CategoryOptionCombo>>,
}

impl TrackerPreheat {
    pub fn new(identifiers: TrackerIdentifierParams) -> Self {
        Self {
            identifiers,
            ..Default::default()
        }
    }

    /// 由快照构建预热存储
    ///
    /// # 参数
    /// - snapshot: 元数据提供方返回的快照
    /// - identifiers: 本批次的标识方案
    ///
    /// # 说明
    /// - 默认类别组合: is_default = true 的组合
    /// - 默认 AOC: 属于默认类别组合的 AOC
    pub fn from_snapshot(snapshot: PreheatSnapshot, identifiers: TrackerIdentifierParams) -> Self {
        let mut preheat = Self::new(identifiers);

        preheat.put_all(snapshot.organisation_units);
        preheat.put_all(snapshot.programs);
        preheat.put_all(snapshot.program_stages);
        preheat.put_all(snapshot.tracked_entity_types);
        preheat.put_all(snapshot.tracked_entity_attributes);
        preheat.put_all(snapshot.category_options);
        preheat.put_all(snapshot.relationship_types);
        preheat.put_all(snapshot.data_elements);
        preheat.put_all(snapshot.program_indicators);
        preheat.put_all(snapshot.legend_sets);

        let default_combo = snapshot
            .category_combos
            .iter()
            .find(|cc| cc.is_default)
            .cloned();
        let default_aoc = default_combo.as_ref().and_then(|cc| {
            snapshot
                .category_option_combos
                .iter()
                .find(|aoc| aoc.category_combo == cc.uid)
                .cloned()
        });

        preheat.put_all(snapshot.category_combos);
        preheat.put_all(snapshot.category_option_combos);

        match (default_combo, default_aoc) {
            (Some(cc), Some(aoc)) => {
                preheat.put_default(cc);
                preheat.put_default(aoc);
            }
            (Some(cc), None) => {
                warn!(category_combo = %cc.uid, "默认类别组合缺少对应 AOC");
                preheat.put_default(cc);
            }
            _ => warn!("快照中未找到默认类别组合"),
        }

        for tei in snapshot.tracked_entities {
            preheat.put_tracked_entity(tei);
        }
        for pi in snapshot.enrollments {
            preheat.put_enrollment(pi);
        }
        for psi in snapshot.events {
            preheat.put_event(psi);
        }
        for fr in snapshot.file_resources {
            preheat.put_file_resource(fr);
        }

        debug!(
            metadata = preheat.uid_index.values().map(HashMap::len).sum::<usize>(),
            tracked_entities = preheat.tracked_entities.len(),
            enrollments = preheat.enrollments.len(),
            events = preheat.events.len(),
            "预热存储构建完成"
        );

        preheat
    }

    pub fn identifiers(&self) -> &TrackerIdentifierParams {
        &self.identifiers
    }

    // ==========================================
    // 元数据写入（构建阶段）
    // ==========================================

    /// 按给定标识方案写入对象
    ///
    /// 方案标识与 uid 分别进入两个索引，彼此不会覆盖；
    /// 方案下取不到标识的对象只能经 uid 索引访问
    pub fn put<T: PreheatObject>(&mut self, identifier: &TrackerIdentifier, object: T) {
        let object = Arc::new(object);

        if let Some(id) = identifier.identify(object.as_ref()) {
            self.metadata
                .entry(T::KIND)
                .or_default()
                .insert(id, T::wrap(Arc::clone(&object)));
        }
        self.uid_index
            .entry(T::KIND)
            .or_default()
            .insert(object.uid().to_string(), T::wrap(object));
    }

    /// 按本批次该种类的标识方案批量写入
    pub fn put_all<T: PreheatObject>(&mut self, objects: Vec<T>) {
        let identifier = self.identifiers.identifier_for(T::KIND).clone();
        for object in objects {
            self.put(&identifier, object);
        }
    }

    pub fn put_default<T: PreheatObject>(&mut self, object: T) {
        self.defaults.insert(T::KIND, T::wrap(Arc::new(object)));
    }

    pub fn put_tracked_entity(&mut self, tei: TrackedEntityInstance) {
        self.tracked_entities.insert(tei.uid.clone(), Arc::new(tei));
    }

    pub fn put_enrollment(&mut self, pi: ProgramInstance) {
        self.enrollments.insert(pi.uid.clone(), Arc::new(pi));
    }

    pub fn put_event(&mut self, psi: ProgramStageInstance) {
        self.events.insert(psi.uid.clone(), Arc::new(psi));
    }

    pub fn put_file_resource(&mut self, fr: FileResource) {
        self.file_resources.insert(fr.uid.clone(), Arc::new(fr));
    }

    // ==========================================
    // 元数据读取
    // ==========================================

    /// 按本批次的方案标识取对象（空白标识 → None）
    ///
    /// 用于载荷中出现的标识；CODE 等方案下原始 uid 不可解析
    pub fn get<T: PreheatObject>(&self, id: &str) -> Option<Arc<T>> {
        let id = id.trim();
        if id.is_empty() {
            return None;
        }

        Self::lookup(&self.metadata, id).or_else(|| self.discovered::<T>(id, false))
    }

    /// 按 uid 取对象
    ///
    /// 用于元数据之间的内部引用（项目的类别组合、阶段所属项目等），与批次标识方案无关
    pub fn get_by_uid<T: PreheatObject>(&self, uid: &str) -> Option<Arc<T>> {
        let uid = uid.trim();
        if uid.is_empty() {
            return None;
        }

        Self::lookup(&self.uid_index, uid).or_else(|| self.discovered::<T>(uid, true))
    }

    fn lookup<T: PreheatObject>(
        index: &HashMap<MetadataKind, HashMap<String, PreheatEntry>>,
        key: &str,
    ) -> Option<Arc<T>> {
        index
            .get(&T::KIND)
            .and_then(|entries| entries.get(key))
            .and_then(T::unwrap)
    }

    fn discovered<T: PreheatObject>(&self, key: &str, by_uid: bool) -> Option<Arc<T>> {
        if T::KIND != MetadataKind::CategoryOptionCombo {
            return None;
        }
        let cache = self
            .discovered_aocs
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let index = if by_uid { &cache.by_uid } else { &cache.by_id };
        index
            .get(key)
            .map(|aoc| PreheatEntry::CategoryOptionCombo(Arc::clone(aoc)))
            .as_ref()
            .and_then(T::unwrap)
    }

    pub fn get_default<T: PreheatObject>(&self) -> Option<Arc<T>> {
        self.defaults.get(&T::KIND).and_then(T::unwrap)
    }

    /// 组织机构查询（批次标识方案已在构建时确定）
    pub fn get_organisation_unit(&self, id: &str) -> Option<Arc<OrganisationUnit>> {
        self.get::<OrganisationUnit>(id)
    }

    pub fn get_category_option_combo(&self, id: &str) -> Option<Arc<CategoryOptionCombo>> {
        self.get::<CategoryOptionCombo>(id)
    }

    /// 写入校验期推导出的 AOC（唯一允许的读后写入）
    pub fn cache_category_option_combo(&self, aoc: Arc<CategoryOptionCombo>) {
        let identifier = self
            .identifiers
            .identifier_for(MetadataKind::CategoryOptionCombo);
        let mut cache = self
            .discovered_aocs
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(id) = identifier.identify(aoc.as_ref()) {
            cache.by_id.insert(id, Arc::clone(&aoc));
        }
        cache.by_uid.insert(aoc.uid.clone(), aoc);
    }

    // ==========================================
    // 已持久化对象读取
    // ==========================================

    pub fn get_tracked_entity(&self, uid: &str) -> Option<Arc<TrackedEntityInstance>> {
        self.tracked_entities.get(uid).cloned()
    }

    pub fn get_enrollment(&self, uid: &str) -> Option<Arc<ProgramInstance>> {
        self.enrollments.get(uid).cloned()
    }

    pub fn get_event(&self, uid: &str) -> Option<Arc<ProgramStageInstance>> {
        self.events.get(uid).cloned()
    }

    pub fn get_file_resource(&self, uid: &str) -> Option<Arc<FileResource>> {
        self.file_resources.get(uid).cloned()
    }
}
