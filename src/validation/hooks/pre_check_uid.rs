// ==========================================
// Tracker 导入管道 - 预检: uid
// ==========================================
// 职责: uid 格式校验 (E1048)、批次内同类型重复 uid (E1130)
// 出错对象剔除
// ==========================================

use crate::domain::tracker::{Enrollment, Event, Relationship, TrackedEntity, TrackerDto};
use crate::validation::context::ValidationContext;
use crate::validation::error_code::TrackerErrorCode;
use crate::validation::hook::ValidationHook;
use crate::validation::report::{TrackerError, ValidationReport};
use crate::validation::value_type::is_valid_uid;

#[derive(Debug, Default)]
pub struct PreCheckUidValidationHook;

impl PreCheckUidValidationHook {
    fn check<D: TrackerDto>(report: &mut ValidationReport, ctx: &ValidationContext<'_>, dto: &D) {
        let type_name = dto.tracker_type().name();

        report.add_error_if(!is_valid_uid(dto.uid()), || {
            TrackerError::new(dto, TrackerErrorCode::E1048)
                .arg(type_name)
                .arg(dto.uid())
        });

        // 同 uid 的所有出现都报告，标识有歧义时一律不导入
        let occurrences = ctx.resolver().batch().occurrences(dto.tracker_type(), dto.uid());
        report.add_error_if(occurrences > 1, || {
            TrackerError::new(dto, TrackerErrorCode::E1130)
                .arg(type_name)
                .arg(dto.uid())
        });
    }
}

impl ValidationHook for PreCheckUidValidationHook {
    fn name(&self) -> &'static str {
        "PreCheckUidValidationHook"
    }

    fn validate_tracked_entity(
        &self,
        report: &mut ValidationReport,
        ctx: &ValidationContext<'_>,
        tracked_entity: &TrackedEntity,
    ) {
        Self::check(report, ctx, tracked_entity);
    }

    fn validate_enrollment(
        &self,
        report: &mut ValidationReport,
        ctx: &ValidationContext<'_>,
        enrollment: &Enrollment,
    ) {
        Self::check(report, ctx, enrollment);
    }

    fn validate_event(&self, report: &mut ValidationReport, ctx: &ValidationContext<'_>, event: &mut Event) {
        Self::check(report, ctx, &*event);
    }

    fn validate_relationship(
        &self,
        report: &mut ValidationReport,
        ctx: &ValidationContext<'_>,
        relationship: &Relationship,
    ) {
        Self::check(report, ctx, relationship);
    }

    fn remove_on_error(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tracker::TrackerBundle;
    use crate::validation::test_support::{self, Fixture};

    #[test]
    fn test_invalid_uid_format() {
        let te = test_support::tracked_entity("1nvalid");
        let bundle = TrackerBundle {
            tracked_entities: vec![te.clone()],
            ..Default::default()
        };
        let fixture = Fixture::new(&bundle);
        let mut report = ValidationReport::new();

        PreCheckUidValidationHook.validate_tracked_entity(&mut report, &fixture.context(), &te);

        assert_eq!(report.error_count(), 1);
        let error = &report.errors()[0];
        assert_eq!(error.error_code, TrackerErrorCode::E1048);
        assert_eq!(error.args, vec!["trackedEntity".to_string(), "1nvalid".to_string()]);
    }

    #[test]
    fn test_duplicate_uid_in_batch() {
        let ev = test_support::event("EV00000001a", None);
        let bundle = TrackerBundle {
            events: vec![ev.clone(), ev.clone()],
            ..Default::default()
        };
        let fixture = Fixture::new(&bundle);
        let mut report = ValidationReport::new();
        let mut ev = ev;

        PreCheckUidValidationHook.validate_event(&mut report, &fixture.context(), &mut ev);

        assert_eq!(report.count_of(TrackerErrorCode::E1130), 1);
        assert!(!report.has_error_code(TrackerErrorCode::E1048));
    }

    #[test]
    fn test_same_uid_across_types_is_allowed() {
        let te = test_support::tracked_entity("AAAAAAAAAAa");
        let en = test_support::enrollment("AAAAAAAAAAa", "AAAAAAAAAAa");
        let bundle = TrackerBundle {
            tracked_entities: vec![te.clone()],
            enrollments: vec![en.clone()],
            ..Default::default()
        };
        let fixture = Fixture::new(&bundle);
        let ctx = fixture.context();
        let mut report = ValidationReport::new();

        PreCheckUidValidationHook.validate_tracked_entity(&mut report, &ctx, &te);
        PreCheckUidValidationHook.validate_enrollment(&mut report, &ctx, &en);

        assert!(!report.has_errors());
    }
}
