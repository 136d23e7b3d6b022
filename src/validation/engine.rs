// ==========================================
// Tracker 导入管道 - 校验引擎
// ==========================================
// 职责: 按固定顺序对批次对象执行校验钩子
// 规则:
// - 已被剔除的对象不再进入后续钩子（按批次位置判定）
// - remove_on_error 钩子新增错误时，对象判为无效
// - 本次导入的取消标志置位后停止迭代
// ==========================================

use crate::domain::tracker::{TrackerBundle, TrackerDto};
use crate::domain::types::TrackerType;
use crate::validation::context::ValidationContext;
use crate::validation::hook::ValidationHook;
use crate::validation::hooks::default_hooks;
use crate::validation::report::ValidationReport;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, instrument, warn};

// ==========================================
// ValidationEngine - 校验引擎
// ==========================================
pub struct ValidationEngine {
    hooks: Vec<Box<dyn ValidationHook>>,
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::new(default_hooks())
    }
}

// 按批次位置记录被剔除的对象
// 同 uid 的重复对象各自判定，互不连带
#[derive(Debug)]
struct RemovedPositions {
    tracked_entities: Vec<bool>,
    enrollments: Vec<bool>,
    events: Vec<bool>,
    relationships: Vec<bool>,
}

impl RemovedPositions {
    fn for_bundle(bundle: &TrackerBundle) -> Self {
        Self {
            tracked_entities: vec![false; bundle.tracked_entities.len()],
            enrollments: vec![false; bundle.enrollments.len()],
            events: vec![false; bundle.events.len()],
            relationships: vec![false; bundle.relationships.len()],
        }
    }
}

impl ValidationEngine {
    pub fn new(hooks: Vec<Box<dyn ValidationHook>>) -> Self {
        Self { hooks }
    }

    /// 校验整个批次（不可取消）
    pub fn validate(&self, ctx: &ValidationContext<'_>, bundle: &mut TrackerBundle) -> ValidationReport {
        self.validate_cancellable(ctx, bundle, &AtomicBool::new(false))
    }

    /// 校验整个批次
    ///
    /// # 参数
    /// - ctx: 校验上下文（预热完成后构建）
    /// - bundle: 导入批次（事件 AOC 推导结果会回写）
    /// - cancelled: 本次导入的取消标志，置位后停止迭代
    ///
    /// # 返回
    /// - ValidationReport: 全部错误与无效对象集合
    #[instrument(skip_all, fields(objects = bundle.object_count()))]
    pub fn validate_cancellable(
        &self,
        ctx: &ValidationContext<'_>,
        bundle: &mut TrackerBundle,
        cancelled: &AtomicBool,
    ) -> ValidationReport {
        let mut report = ValidationReport::new();
        let mut removed = RemovedPositions::for_bundle(bundle);
        let is_cancelled = || cancelled.load(Ordering::Relaxed);

        for hook in &self.hooks {
            if is_cancelled() {
                warn!(hook = hook.name(), "校验已取消，停止执行后续钩子");
                break;
            }

            let before = report.error_count();
            let remove = hook.remove_on_error();

            for (te, skip) in bundle.tracked_entities.iter().zip(removed.tracked_entities.iter_mut()) {
                if is_cancelled() {
                    break;
                }
                Self::run_one(&mut report, te, skip, remove, |r| {
                    hook.validate_tracked_entity(r, ctx, te)
                });
            }
            for (en, skip) in bundle.enrollments.iter().zip(removed.enrollments.iter_mut()) {
                if is_cancelled() {
                    break;
                }
                Self::run_one(&mut report, en, skip, remove, |r| {
                    hook.validate_enrollment(r, ctx, en)
                });
            }
            for (ev, skip) in bundle.events.iter_mut().zip(removed.events.iter_mut()) {
                if is_cancelled() {
                    break;
                }
                if *skip {
                    continue;
                }
                let errors_before = report.error_count();
                hook.validate_event(&mut report, ctx, ev);
                if remove && report.error_count() > errors_before {
                    *skip = true;
                    report.mark_invalid(TrackerType::Event, &ev.event);
                }
            }
            for (rel, skip) in bundle.relationships.iter().zip(removed.relationships.iter_mut()) {
                if is_cancelled() {
                    break;
                }
                Self::run_one(&mut report, rel, skip, remove, |r| {
                    hook.validate_relationship(r, ctx, rel)
                });
            }

            debug!(
                hook = hook.name(),
                new_errors = report.error_count() - before,
                "校验钩子执行完成"
            );
        }

        info!(
            errors = report.error_count(),
            invalid_tracked_entities = report.invalid_count(TrackerType::TrackedEntity),
            invalid_enrollments = report.invalid_count(TrackerType::Enrollment),
            invalid_events = report.invalid_count(TrackerType::Event),
            invalid_relationships = report.invalid_count(TrackerType::Relationship),
            "批次校验完成"
        );

        report
    }

    fn run_one<D, F>(
        report: &mut ValidationReport,
        dto: &D,
        removed: &mut bool,
        remove_on_error: bool,
        validate: F,
    ) where
        D: TrackerDto,
        F: FnOnce(&mut ValidationReport),
    {
        if *removed {
            return;
        }
        let errors_before = report.error_count();
        validate(report);
        if remove_on_error && report.error_count() > errors_before {
            *removed = true;
            report.mark_invalid(dto.tracker_type(), dto.uid());
        }
    }
}

/// 从批次中剔除被判无效或带有错误的对象
///
/// # 返回
/// - 剔除的对象数
pub fn remove_invalid_objects(bundle: &mut TrackerBundle, report: &ValidationReport) -> usize {
    let before = bundle.object_count();
    let rejected = |tracker_type: TrackerType, uid: &str| {
        report.is_invalid(tracker_type, uid) || report.has_errors_for(tracker_type, uid)
    };

    bundle
        .tracked_entities
        .retain(|o| !rejected(o.tracker_type(), o.uid()));
    bundle
        .enrollments
        .retain(|o| !rejected(o.tracker_type(), o.uid()));
    bundle
        .events
        .retain(|o| !rejected(o.tracker_type(), o.uid()));
    bundle
        .relationships
        .retain(|o| !rejected(o.tracker_type(), o.uid()));

    before - bundle.object_count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tracker::{Relationship, RelationshipItem};
    use crate::validation::error_code::TrackerErrorCode;
    use crate::validation::test_support::{self, Fixture};

    fn bundle() -> TrackerBundle {
        let mut bad_ou = test_support::tracked_entity("TE00000002a");
        bad_ou.org_unit = "OU_MISSING1".to_string();
        TrackerBundle {
            tracked_entities: vec![test_support::tracked_entity("TE00000001a"), bad_ou],
            enrollments: vec![test_support::enrollment("EN00000001a", "TE00000001a")],
            events: vec![test_support::event("EV00000001a", Some("EN00000001a"))],
            relationships: vec![Relationship {
                relationship: "REL0000001a".to_string(),
                relationship_type: Some("RT00000002a".to_string()),
                from: RelationshipItem::Enrollment("EN00000001a".to_string()),
                to: RelationshipItem::Event("EV00000404a".to_string()),
                bidirectional: false,
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_removed_objects_skip_later_hooks() {
        let mut bundle = bundle();
        let fixture = Fixture::new(&bundle);
        let engine = ValidationEngine::default();

        let report = engine.validate(&fixture.context(), &mut bundle);

        // 组织机构缺失的实体被剔除，后续钩子不再检查
        assert_eq!(report.errors_for(TrackerType::TrackedEntity, "TE00000002a").count(), 1);
        assert!(report.is_invalid(TrackerType::TrackedEntity, "TE00000002a"));
        assert_eq!(report.count_of(TrackerErrorCode::E4012), 1);
        assert!(report.is_invalid(TrackerType::Relationship, "REL0000001a"));
        assert!(!report.is_invalid(TrackerType::Event, "EV00000001a"));
        assert_eq!(report.error_count(), 2);

        let removed = remove_invalid_objects(&mut bundle, &report);
        assert_eq!(removed, 2);
        assert_eq!(bundle.tracked_entities.len(), 1);
        assert!(bundle.relationships.is_empty());
    }

    #[test]
    fn test_attribute_errors_do_not_remove_object() {
        let mut te = test_support::tracked_entity("TE00000001a");
        te.attributes.clear();
        let mut bundle = TrackerBundle {
            tracked_entities: vec![te],
            ..Default::default()
        };
        let fixture = Fixture::new(&bundle);

        let report = ValidationEngine::default().validate(&fixture.context(), &mut bundle);

        assert_eq!(report.count_of(TrackerErrorCode::E1090), 1);
        assert!(!report.is_invalid(TrackerType::TrackedEntity, "TE00000001a"));
        // 但仍不落库
        assert_eq!(remove_invalid_objects(&mut bundle, &report), 1);
    }

    #[test]
    fn test_cancelled_engine_stops() {
        let mut bundle = bundle();
        let fixture = Fixture::new(&bundle);
        let engine = ValidationEngine::default();
        let cancelled = AtomicBool::new(true);

        let report = engine.validate_cancellable(&fixture.context(), &mut bundle, &cancelled);

        assert!(!report.has_errors());

        // 取消只作用于那一次校验
        let report = engine.validate(&fixture.context(), &mut bundle);
        assert_eq!(report.error_count(), 2);
    }

    #[test]
    fn test_duplicate_uid_reported_on_every_occurrence() {
        let mut bundle = TrackerBundle {
            events: vec![
                test_support::event("EV00000001a", None),
                test_support::event("EV00000001a", None),
            ],
            ..Default::default()
        };
        let fixture = Fixture::new(&bundle);

        let report = ValidationEngine::default().validate(&fixture.context(), &mut bundle);

        assert_eq!(report.count_of(TrackerErrorCode::E1130), 2);
        assert!(report.is_invalid(TrackerType::Event, "EV00000001a"));
        assert_eq!(remove_invalid_objects(&mut bundle, &report), 2);
    }

    #[test]
    fn test_duplicate_tracked_entities_both_reported() {
        let mut bundle = TrackerBundle {
            tracked_entities: vec![
                test_support::tracked_entity("TE00000001a"),
                test_support::tracked_entity("TE00000001a"),
            ],
            ..Default::default()
        };
        let fixture = Fixture::new(&bundle);

        let report = ValidationEngine::default().validate(&fixture.context(), &mut bundle);

        assert_eq!(report.count_of(TrackerErrorCode::E1130), 2);
        assert_eq!(report.error_count(), 2);
    }
}
