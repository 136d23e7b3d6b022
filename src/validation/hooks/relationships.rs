// ==========================================
// Tracker 导入管道 - 关系校验
// ==========================================
// 职责: 关系两端与关系类型约束一致
// - 两端不能是同一对象 E4000
// - 端点种类与约束实体一致 E4010
// - 跟踪实体端: 实体类型与约束一致 E4014
// - 登记端: 项目与约束一致 E4015
// 出错对象剔除
// ==========================================

use crate::domain::metadata::{RelationshipConstraint, RelationshipType};
use crate::domain::tracker::{Relationship, RelationshipItem};
use crate::validation::context::ValidationContext;
use crate::validation::error_code::TrackerErrorCode;
use crate::validation::hook::ValidationHook;
use crate::validation::report::{TrackerError, ValidationReport};

#[derive(Debug, Default)]
pub struct RelationshipsValidationHook;

impl RelationshipsValidationHook {
    fn validate_constraint(
        report: &mut ValidationReport,
        ctx: &ValidationContext<'_>,
        relationship: &Relationship,
        relationship_type: &RelationshipType,
        constraint: &RelationshipConstraint,
        item: &RelationshipItem,
    ) {
        let expected = constraint.relationship_entity.tracker_type();
        if item.tracker_type() != expected {
            report.add_error(
                TrackerError::new(relationship, TrackerErrorCode::E4010)
                    .arg(&relationship_type.uid)
                    .arg(expected.name())
                    .arg(item.tracker_type().name()),
            );
            return;
        }

        match item {
            RelationshipItem::TrackedEntity(uid) => {
                if let Some(tet) = constraint.tracked_entity_type.as_deref() {
                    let actual = ctx.resolver().tracked_entity_type_of(uid);
                    report.add_error_if(actual.as_deref() != Some(tet), || {
                        TrackerError::new(relationship, TrackerErrorCode::E4014)
                            .arg(&relationship_type.uid)
                            .arg(tet)
                            .arg(actual.as_deref().unwrap_or("null"))
                    });
                }
            }
            RelationshipItem::Enrollment(uid) => {
                if let Some(program) = constraint.program.as_deref() {
                    let actual = ctx.resolver().enrollment_program_of(uid);
                    report.add_error_if(actual.as_deref() != Some(program), || {
                        TrackerError::new(relationship, TrackerErrorCode::E4015)
                            .arg(&relationship_type.uid)
                            .arg(program)
                            .arg(actual.as_deref().unwrap_or("null"))
                    });
                }
            }
            RelationshipItem::Event(_) => {}
        }
    }
}

impl ValidationHook for RelationshipsValidationHook {
    fn name(&self) -> &'static str {
        "RelationshipsValidationHook"
    }

    fn validate_relationship(
        &self,
        report: &mut ValidationReport,
        ctx: &ValidationContext<'_>,
        relationship: &Relationship,
    ) {
        report.add_error_if(relationship.from == relationship.to, || {
            TrackerError::new(relationship, TrackerErrorCode::E4000).arg(&relationship.relationship)
        });

        let Some(relationship_type) = relationship
            .relationship_type_id()
            .and_then(|id| ctx.relationship_type(id))
        else {
            return;
        };

        Self::validate_constraint(
            report,
            ctx,
            relationship,
            &relationship_type,
            &relationship_type.from_constraint,
            &relationship.from,
        );
        Self::validate_constraint(
            report,
            ctx,
            relationship,
            &relationship_type,
            &relationship_type.to_constraint,
            &relationship.to,
        );
    }

    fn remove_on_error(&self) -> bool {
        true
    }
}
