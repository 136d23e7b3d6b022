// ==========================================
// Tracker 导入管道 - 属性选项组合 (AOC) 解析
// ==========================================
// 职责: 为事件校验/推导属性选项组合
// 路径:
// 1. 给出 AOC → 直接查找，并与项目类别组合交叉校验
// 2. 未给 AOC、给出类别选项 → 按 (选项串 + 组合 uid) 记忆化查询类别服务，回写事件与预热
// 3. 两者都未给 → 项目组合必须是默认组合，取默认 AOC
// 红线: 失败只影响当前事件，不影响批次
// ==========================================

use crate::domain::metadata::{CategoryCombo, CategoryOptionCombo, Program};
use crate::domain::tracker::Event;
use crate::resolver::reference::ReferenceResolver;
use crate::validation::error_code::TrackerErrorCode;
use crate::validation::report::{TrackerError, ValidationReport};
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, trace};

// ==========================================
// CategoryService Trait
// ==========================================
// 用途: 外部类别组合协作方，按选项集合查找 AOC
// 实现者: InMemoryCategoryService
pub trait CategoryService: Send + Sync {
    /// 查找组合下选项集合完全一致的 AOC
    ///
    /// # 参数
    /// - category_combo: 项目类别组合
    /// - category_options: 类别选项 uid 集合
    ///
    /// # 返回
    /// - None: 不存在
    fn get_category_option_combo(
        &self,
        category_combo: &CategoryCombo,
        category_options: &BTreeSet<String>,
    ) -> Option<Arc<CategoryOptionCombo>>;
}

// ==========================================
// InMemoryCategoryService - 内存类别服务
// ==========================================
#[derive(Debug, Default)]
pub struct InMemoryCategoryService {
    option_combos: Vec<Arc<CategoryOptionCombo>>,
}

impl InMemoryCategoryService {
    pub fn new(option_combos: Vec<CategoryOptionCombo>) -> Self {
        Self {
            option_combos: option_combos.into_iter().map(Arc::new).collect(),
        }
    }
}

impl CategoryService for InMemoryCategoryService {
    fn get_category_option_combo(
        &self,
        category_combo: &CategoryCombo,
        category_options: &BTreeSet<String>,
    ) -> Option<Arc<CategoryOptionCombo>> {
        self.option_combos
            .iter()
            .find(|aoc| {
                aoc.category_combo == category_combo.uid && aoc.matches_options(category_options)
            })
            .cloned()
    }
}

// ==========================================
// AttributeOptionComboCache - 单次导入的 AOC 缓存
// ==========================================
// by_options: (选项串 + 组合 uid) → AOC uid，None 表示"查无"
// by_event: 事件 uid → 已解析 AOC，供后续校验器使用
#[derive(Debug, Default)]
pub struct AttributeOptionComboCache {
    by_options: Mutex<HashMap<String, Option<String>>>,
    by_event: Mutex<HashMap<String, Arc<CategoryOptionCombo>>>,
}

impl AttributeOptionComboCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// 外层 None = 未缓存；内层 None = 已缓存"查无"
    pub fn get_by_options(&self, key: &str) -> Option<Option<String>> {
        self.by_options
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    pub fn put_by_options(&self, key: String, aoc_uid: Option<String>) {
        self.by_options
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, aoc_uid);
    }

    pub fn cache_event_aoc(&self, event_uid: &str, aoc: Arc<CategoryOptionCombo>) {
        self.by_event
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(event_uid.to_string(), aoc);
    }

    pub fn event_aoc(&self, event_uid: &str) -> Option<Arc<CategoryOptionCombo>> {
        self.by_event
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(event_uid)
            .cloned()
    }
}

// ==========================================
// AttributeOptionComboResolver - AOC 解析器
// ==========================================
pub struct AttributeOptionComboResolver<'a> {
    resolver: &'a ReferenceResolver<'a>,
    category_service: &'a dyn CategoryService,
    cache: &'a AttributeOptionComboCache,
}

impl<'a> AttributeOptionComboResolver<'a> {
    pub fn new(
        resolver: &'a ReferenceResolver<'a>,
        category_service: &'a dyn CategoryService,
        cache: &'a AttributeOptionComboCache,
    ) -> Self {
        Self {
            resolver,
            category_service,
            cache,
        }
    }

    /// 校验并解析事件的 AOC
    ///
    /// # 参数
    /// - report: 校验报告（错误写入此处）
    /// - event: 事件（推导成功时回写 AOC 标识）
    /// - program: 事件所属项目（已解析）
    ///
    /// # 返回
    /// - Some(aoc): 解析成功，已按事件缓存
    /// - None: 已写入错误
    pub fn resolve(
        &self,
        report: &mut ValidationReport,
        event: &mut Event,
        program: &Program,
    ) -> Option<Arc<CategoryOptionCombo>> {
        let category_combo = match self
            .resolver
            .preheat()
            .get_by_uid::<CategoryCombo>(&program.category_combo)
        {
            Some(cc) => cc,
            None => {
                report.add_error(
                    TrackerError::new(&*event, TrackerErrorCode::E1115).arg(&program.category_combo),
                );
                return None;
            }
        };

        // 步骤 1: AOC / 类别选项存在性 + 默认组合要求（不短路，全部报告）
        let exists = self.validate_aoc_exists(report, event);
        let options_exist = self.validate_category_options_exist(report, event);
        let default_ok = self.validate_default_category_combo(report, event, &category_combo);
        if !(exists && options_exist && default_ok) {
            return None;
        }

        // 步骤 2: AOC / 类别选项须属于项目组合
        let aoc_in_combo = self.validate_aoc_in_program_combo(report, event, &category_combo);
        let options_in_combo =
            self.validate_category_options_in_program_combo(report, event, &category_combo);
        if !(aoc_in_combo && options_in_combo) {
            return None;
        }

        // 步骤 3: 解析
        let aoc = self.resolve_aoc(event, &category_combo);

        // 步骤 4: 必须解析到 AOC
        let aoc = match aoc {
            Some(aoc) => aoc,
            None => {
                let arg = event
                    .attribute_option_combo_id()
                    .map(str::to_string)
                    .unwrap_or_else(|| category_combo.uid.clone());
                report.add_error(TrackerError::new(&*event, TrackerErrorCode::E1115).arg(arg));
                return None;
            }
        };

        // 步骤 5: 类别选项与 AOC 精确匹配
        if let Some(cos) = event.attribute_category_options_str() {
            if !aoc.matches_options(&self.category_option_uids(event)) {
                let aoc_arg = event
                    .attribute_option_combo_id()
                    .unwrap_or(aoc.uid.as_str())
                    .to_string();
                report.add_error(
                    TrackerError::new(&*event, TrackerErrorCode::E1117)
                        .arg(cos)
                        .arg(aoc_arg),
                );
                return None;
            }
        }

        // 步骤 6: 按事件缓存
        self.cache.cache_event_aoc(&event.event, Arc::clone(&aoc));
        trace!(event = %event.event, aoc = %aoc.uid, "事件 AOC 已缓存");
        Some(aoc)
    }

    fn validate_aoc_exists(&self, report: &mut ValidationReport, event: &Event) -> bool {
        match event.attribute_option_combo_id() {
            None => true,
            Some(id) => {
                let found = self.resolver.category_option_combo(id).is_some();
                report.add_error_if(!found, || {
                    TrackerError::new(event, TrackerErrorCode::E1115).arg(id)
                });
                found
            }
        }
    }

    fn validate_category_options_exist(&self, report: &mut ValidationReport, event: &Event) -> bool {
        let mut all_exist = true;
        for id in event.category_option_ids() {
            if self.resolver.category_option(&id).is_none() {
                report.add_error(TrackerError::new(event, TrackerErrorCode::E1116).arg(&id));
                all_exist = false;
            }
        }
        all_exist
    }

    /// AOC 与类别选项都未给出时，仅允许默认组合
    fn validate_default_category_combo(
        &self,
        report: &mut ValidationReport,
        event: &Event,
        category_combo: &CategoryCombo,
    ) -> bool {
        if event.attribute_option_combo_id().is_some()
            || event.attribute_category_options_str().is_some()
        {
            return true;
        }

        report.add_error_if(!category_combo.is_default, || {
            TrackerError::new(event, TrackerErrorCode::E1055)
        });
        category_combo.is_default
    }

    fn validate_aoc_in_program_combo(
        &self,
        report: &mut ValidationReport,
        event: &Event,
        category_combo: &CategoryCombo,
    ) -> bool {
        let id = match event.attribute_option_combo_id() {
            Some(id) => id,
            None => return true,
        };
        let aoc = match self.resolver.category_option_combo(id) {
            Some(aoc) => aoc,
            None => return false,
        };

        if aoc.category_combo == category_combo.uid {
            return true;
        }

        let aoc_combo_is_default = self
            .resolver
            .preheat()
            .get_by_uid::<CategoryCombo>(&aoc.category_combo)
            .is_some_and(|cc| cc.is_default);
        let code = if aoc_combo_is_default {
            TrackerErrorCode::E1055
        } else {
            TrackerErrorCode::E1054
        };
        report.add_error(
            TrackerError::new(event, code)
                .arg(id)
                .arg(&category_combo.uid),
        );
        false
    }

    fn validate_category_options_in_program_combo(
        &self,
        report: &mut ValidationReport,
        event: &Event,
        category_combo: &CategoryCombo,
    ) -> bool {
        let cos = match event.attribute_category_options_str() {
            Some(cos) => cos,
            None => return true,
        };

        let in_combo = category_combo.contains_all(&self.category_option_uids(event));
        report.add_error_if(!in_combo, || {
            TrackerError::new(event, TrackerErrorCode::E1117)
                .arg(cos)
                .arg(&category_combo.uid)
        });
        in_combo
    }

    fn resolve_aoc(
        &self,
        event: &mut Event,
        category_combo: &CategoryCombo,
    ) -> Option<Arc<CategoryOptionCombo>> {
        let preheat = self.resolver.preheat();

        if category_combo.is_default {
            return preheat.get_default::<CategoryOptionCombo>();
        }

        if event.attribute_option_combo_id().is_none()
            && event.attribute_category_options_str().is_some()
        {
            let aoc = self.fetch_attribute_option_combo(event, category_combo)?;

            // 回写事件与预热，落库时可直接使用
            let identifier = preheat
                .identifiers()
                .category_option_combo_id_scheme
                .identify(aoc.as_ref())
                .unwrap_or_else(|| aoc.uid.clone());
            debug!(event = %event.event, aoc = %identifier, "由类别选项推导出 AOC");
            event.attribute_option_combo = Some(identifier);
            preheat.cache_category_option_combo(Arc::clone(&aoc));
            return Some(aoc);
        }

        event
            .attribute_option_combo_id()
            .and_then(|id| self.resolver.category_option_combo(id))
    }

    /// 记忆化查询（包括"查无"结果）
    fn fetch_attribute_option_combo(
        &self,
        event: &Event,
        category_combo: &CategoryCombo,
    ) -> Option<Arc<CategoryOptionCombo>> {
        let cos = event.attribute_category_options_str().unwrap_or_default();
        let cache_key = format!("{}{}", cos, category_combo.uid);

        if let Some(cached) = self.cache.get_by_options(&cache_key) {
            trace!(key = %cache_key, "AOC 记忆化命中");
            return cached
                .and_then(|uid| self.resolver.preheat().get_by_uid::<CategoryOptionCombo>(&uid));
        }

        let aoc = self
            .category_service
            .get_category_option_combo(category_combo, &self.category_option_uids(event));
        self.cache
            .put_by_options(cache_key, aoc.as_ref().map(|aoc| aoc.uid.clone()));
        aoc
    }

    /// 事件类别选项解析为 uid 集合（无法解析的保留原标识）
    fn category_option_uids(&self, event: &Event) -> BTreeSet<String> {
        event
            .category_option_ids()
            .into_iter()
            .map(|id| {
                self.resolver
                    .category_option(&id)
                    .map(|co| co.uid.clone())
                    .unwrap_or(id)
            })
            .collect()
    }
}
