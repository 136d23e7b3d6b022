// ==========================================
// Tracker 导入管道 - 预检: 数据关系
// ==========================================
// 职责: 对象之间、对象与元数据之间的交叉一致性
// - 登记: 项目需登记 E1014、组织机构属于项目 E1041、实体类型一致 E1022
// - 事件: 阶段属于项目 E1089、登记缺失/不一致 E1033/E1079、组织机构 E1029、AOC
// - 关系: 两端对象存在 E4012
// 出错对象剔除
// ==========================================

use crate::domain::tracker::{Enrollment, Event, Relationship, RelationshipItem};
use crate::validation::context::ValidationContext;
use crate::validation::error_code::TrackerErrorCode;
use crate::validation::hook::ValidationHook;
use crate::validation::report::{TrackerError, ValidationReport};
use tracing::trace;

#[derive(Debug, Default)]
pub struct PreCheckDataRelationsValidationHook;

impl PreCheckDataRelationsValidationHook {
    /// 组织机构标识解析为 uid（无法解析时保留原值）
    fn org_unit_uid(ctx: &ValidationContext<'_>, id: &str) -> String {
        ctx.organisation_unit(id)
            .map(|ou| ou.uid.clone())
            .unwrap_or_else(|| id.to_string())
    }

    fn validate_item(
        report: &mut ValidationReport,
        ctx: &ValidationContext<'_>,
        relationship: &Relationship,
        item: &RelationshipItem,
    ) {
        report.add_error_if(!ctx.resolver().item_exists(item), || {
            TrackerError::new(relationship, TrackerErrorCode::E4012)
                .arg(item.tracker_type().name())
                .arg(item.uid())
        });
    }
}

impl ValidationHook for PreCheckDataRelationsValidationHook {
    fn name(&self) -> &'static str {
        "PreCheckDataRelationsValidationHook"
    }

    fn validate_enrollment(
        &self,
        report: &mut ValidationReport,
        ctx: &ValidationContext<'_>,
        enrollment: &Enrollment,
    ) {
        let Some(program) = ctx.program(&enrollment.program) else {
            return;
        };

        report.add_error_if(!program.is_registration(), || {
            TrackerError::new(enrollment, TrackerErrorCode::E1014).arg(&program.uid)
        });

        let org_unit = Self::org_unit_uid(ctx, &enrollment.org_unit);
        report.add_error_if(!program.has_organisation_unit(&org_unit), || {
            TrackerError::new(enrollment, TrackerErrorCode::E1041)
                .arg(&enrollment.org_unit)
                .arg(&program.uid)
        });

        if let Some(tet) = program.tracked_entity_type.as_deref() {
            let te_type = ctx
                .resolver()
                .tracked_entity_type_of(&enrollment.tracked_entity);
            report.add_error_if(te_type.as_deref() != Some(tet), || {
                TrackerError::new(enrollment, TrackerErrorCode::E1022)
                    .arg(&enrollment.tracked_entity)
                    .arg(&program.uid)
            });
        }
    }

    fn validate_event(&self, report: &mut ValidationReport, ctx: &ValidationContext<'_>, event: &mut Event) {
        let Some(program) = ctx.program(&event.program) else {
            return;
        };

        if let Some(stage) = ctx.program_stage(&event.program_stage) {
            report.add_error_if(stage.program != program.uid, || {
                TrackerError::new(&*event, TrackerErrorCode::E1089)
                    .arg(&event.event)
                    .arg(&stage.uid)
                    .arg(&program.uid)
            });
        }

        if program.is_registration() {
            match event.enrollment_id() {
                None => report.add_error(
                    TrackerError::new(&*event, TrackerErrorCode::E1033).arg(&event.event),
                ),
                Some(enrollment) => {
                    let enrollment_program = ctx.resolver().enrollment_program_of(enrollment);
                    report.add_error_if(enrollment_program.as_deref() != Some(program.uid.as_str()), || {
                        TrackerError::new(&*event, TrackerErrorCode::E1079)
                            .arg(&event.event)
                            .arg(&program.uid)
                            .arg(enrollment)
                    });
                }
            }
        }

        let org_unit = Self::org_unit_uid(ctx, &event.org_unit);
        report.add_error_if(!program.has_organisation_unit(&org_unit), || {
            TrackerError::new(&*event, TrackerErrorCode::E1029)
                .arg(&event.org_unit)
                .arg(&program.uid)
        });

        if let Some(aoc) = ctx.aoc_resolver().resolve(report, event, &program) {
            trace!(event = %event.event, aoc = %aoc.uid, "事件 AOC 校验通过");
        }
    }

    fn validate_relationship(
        &self,
        report: &mut ValidationReport,
        ctx: &ValidationContext<'_>,
        relationship: &Relationship,
    ) {
        Self::validate_item(report, ctx, relationship, &relationship.from);
        Self::validate_item(report, ctx, relationship, &relationship.to);
    }

    fn remove_on_error(&self) -> bool {
        true
    }
}
