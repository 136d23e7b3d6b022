// ==========================================
// Tracker 导入管道 - 预检: 元数据存在性
// ==========================================
// 职责: 各对象引用的元数据/对象必须能解析
// - 跟踪实体: 组织机构 E1049、跟踪实体类型 E1005
// - 登记: 组织机构 E1070、项目 E1069、跟踪实体 E1068
// - 事件: 组织机构 E1011、项目 E1010、项目阶段 E1013
// - 关系: 关系类型 E4006
// 出错对象剔除
// ==========================================

use crate::domain::metadata::{
    OrganisationUnit, Program, ProgramStage, RelationshipType, TrackedEntityType,
};
use crate::domain::tracker::{Enrollment, Event, Relationship, TrackedEntity, TrackerDto};
use crate::preheat::PreheatObject;
use crate::validation::context::ValidationContext;
use crate::validation::error_code::TrackerErrorCode;
use crate::validation::hook::ValidationHook;
use crate::validation::report::{TrackerError, ValidationReport};
use tracing::trace;

#[derive(Debug, Default)]
pub struct PreCheckMetaValidationHook;

impl PreCheckMetaValidationHook {
    /// 元数据引用必须能解析
    ///
    /// 缺省标识以 "null" 作为错误参数，给出但无法解析时使用原始标识
    fn require<T: PreheatObject, D: TrackerDto>(
        report: &mut ValidationReport,
        ctx: &ValidationContext<'_>,
        dto: &D,
        id: Option<&str>,
        code: TrackerErrorCode,
    ) {
        let reference = ctx.resolver().resolve::<T>(id);
        if let Some(arg) = reference.missing_arg() {
            trace!(uid = dto.uid(), code = %code, reference = arg, "元数据引用无法解析");
            report.add_error(TrackerError::new(dto, code).arg(arg));
        }
    }
}

impl ValidationHook for PreCheckMetaValidationHook {
    fn name(&self) -> &'static str {
        "PreCheckMetaValidationHook"
    }

    fn validate_tracked_entity(
        &self,
        report: &mut ValidationReport,
        ctx: &ValidationContext<'_>,
        tracked_entity: &TrackedEntity,
    ) {
        Self::require::<OrganisationUnit, _>(
            report,
            ctx,
            tracked_entity,
            Some(&tracked_entity.org_unit),
            TrackerErrorCode::E1049,
        );
        Self::require::<TrackedEntityType, _>(
            report,
            ctx,
            tracked_entity,
            Some(&tracked_entity.tracked_entity_type),
            TrackerErrorCode::E1005,
        );
    }

    fn validate_enrollment(
        &self,
        report: &mut ValidationReport,
        ctx: &ValidationContext<'_>,
        enrollment: &Enrollment,
    ) {
        Self::require::<OrganisationUnit, _>(
            report,
            ctx,
            enrollment,
            Some(&enrollment.org_unit),
            TrackerErrorCode::E1070,
        );
        Self::require::<Program, _>(
            report,
            ctx,
            enrollment,
            Some(&enrollment.program),
            TrackerErrorCode::E1069,
        );
        report.add_error_if(
            !ctx.resolver()
                .tracked_entity_exists(&enrollment.tracked_entity),
            || {
                TrackerError::new(enrollment, TrackerErrorCode::E1068)
                    .arg(&enrollment.tracked_entity)
            },
        );
    }

    fn validate_event(&self, report: &mut ValidationReport, ctx: &ValidationContext<'_>, event: &mut Event) {
        let event = &*event;
        Self::require::<OrganisationUnit, _>(
            report,
            ctx,
            event,
            Some(&event.org_unit),
            TrackerErrorCode::E1011,
        );
        Self::require::<Program, _>(
            report,
            ctx,
            event,
            Some(&event.program),
            TrackerErrorCode::E1010,
        );
        Self::require::<ProgramStage, _>(
            report,
            ctx,
            event,
            Some(&event.program_stage),
            TrackerErrorCode::E1013,
        );
    }

    fn validate_relationship(
        &self,
        report: &mut ValidationReport,
        ctx: &ValidationContext<'_>,
        relationship: &Relationship,
    ) {
        Self::require::<RelationshipType, _>(
            report,
            ctx,
            relationship,
            relationship.relationship_type_id(),
            TrackerErrorCode::E4006,
        );
    }

    fn remove_on_error(&self) -> bool {
        true
    }
}
