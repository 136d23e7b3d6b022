// ==========================================
// Tracker 导入管道 - 跟踪实体属性校验
// ==========================================
// 职责: 跟踪实体的属性内容
// - 类型必填属性缺失 E1090
// - 未知属性 E1006；必填属性显式置空 E1076
// - 长度超限 E1077；机密属性需加密可用 E1112
// - 值类型 E1085；选项集 E1125
// - 文件资源缺失 E1084 / 已占用 E1009
// 出错对象不剔除（属性问题不影响其他钩子对该对象的判断）
// ==========================================

use crate::domain::metadata::{TrackedEntityAttribute, TrackedEntityType};
use crate::domain::tracker::{Attribute, TrackedEntity};
use crate::validation::context::ValidationContext;
use crate::validation::error_code::TrackerErrorCode;
use crate::validation::hook::ValidationHook;
use crate::validation::report::{TrackerError, ValidationReport};
use crate::validation::value_type::data_value_is_valid;
use std::collections::HashSet;

#[derive(Debug, Default)]
pub struct TrackedEntityAttributeValidationHook;

impl TrackedEntityAttributeValidationHook {
    /// 类型声明的必填属性必须全部出现
    fn validate_mandatory_attributes(
        report: &mut ValidationReport,
        ctx: &ValidationContext<'_>,
        tracked_entity: &TrackedEntity,
        tracked_entity_type: &TrackedEntityType,
    ) {
        // 载荷中的属性标识统一解析为 uid 比较
        let declared: HashSet<String> = tracked_entity
            .attributes
            .iter()
            .map(|a| {
                ctx.tracked_entity_attribute(&a.attribute)
                    .map(|tea| tea.uid.clone())
                    .unwrap_or_else(|| a.attribute.clone())
            })
            .collect();

        for mandatory in tracked_entity_type.mandatory_attributes() {
            report.add_error_if(!declared.contains(mandatory), || {
                TrackerError::new(tracked_entity, TrackerErrorCode::E1090)
                    .arg(mandatory)
                    .arg(&tracked_entity_type.uid)
                    .arg(&tracked_entity.tracked_entity)
            });
        }
    }

    fn validate_value(
        report: &mut ValidationReport,
        ctx: &ValidationContext<'_>,
        tracked_entity: &TrackedEntity,
        attribute: &Attribute,
        tea: &TrackedEntityAttribute,
        value: &str,
    ) {
        let max_length = ctx.settings().max_attribute_value_length;
        report.add_error_if(value.chars().count() > max_length, || {
            TrackerError::new(tracked_entity, TrackerErrorCode::E1077)
                .arg(&tea.uid)
                .arg(max_length)
        });

        report.add_error_if(
            tea.confidential && !ctx.settings().encryption_status.is_ok(),
            || TrackerError::new(tracked_entity, TrackerErrorCode::E1112).arg(&tea.uid),
        );

        if let Some(reason) = data_value_is_valid(value, tea.value_type) {
            report.add_error(
                TrackerError::new(tracked_entity, TrackerErrorCode::E1085)
                    .arg(&tea.uid)
                    .arg(reason),
            );
        }

        if let Some(option_set) = &tea.option_set {
            report.add_error_if(!option_set.contains(value), || {
                TrackerError::new(tracked_entity, TrackerErrorCode::E1125)
                    .arg(value)
                    .arg(&tea.uid)
                    .arg(&option_set.uid)
            });
        }

        let value_type = attribute.value_type.unwrap_or(tea.value_type);
        if value_type.is_file() {
            Self::validate_file_resource(report, ctx, tracked_entity, tea, value);
        }
    }

    fn validate_file_resource(
        report: &mut ValidationReport,
        ctx: &ValidationContext<'_>,
        tracked_entity: &TrackedEntity,
        tea: &TrackedEntityAttribute,
        value: &str,
    ) {
        // 已存在实体的该属性原值即此文件：不是重新占用
        let unchanged = ctx
            .preheat()
            .get_tracked_entity(&tracked_entity.tracked_entity)
            .and_then(|tei| tei.attribute_values.get(&tea.uid).cloned())
            .is_some_and(|existing| existing == value);
        if unchanged {
            return;
        }

        match ctx.preheat().get_file_resource(value) {
            None => report.add_error(
                TrackerError::new(tracked_entity, TrackerErrorCode::E1084).arg(value),
            ),
            Some(file_resource) => report.add_error_if(file_resource.assigned, || {
                TrackerError::new(tracked_entity, TrackerErrorCode::E1009).arg(value)
            }),
        }
    }
}

impl ValidationHook for TrackedEntityAttributeValidationHook {
    fn name(&self) -> &'static str {
        "TrackedEntityAttributeValidationHook"
    }

    fn validate_tracked_entity(
        &self,
        report: &mut ValidationReport,
        ctx: &ValidationContext<'_>,
        tracked_entity: &TrackedEntity,
    ) {
        let Some(tracked_entity_type) = ctx.tracked_entity_type(&tracked_entity.tracked_entity_type)
        else {
            return;
        };

        Self::validate_mandatory_attributes(report, ctx, tracked_entity, &tracked_entity_type);

        for attribute in &tracked_entity.attributes {
            let Some(tea) = ctx.tracked_entity_attribute(&attribute.attribute) else {
                report.add_error(
                    TrackerError::new(tracked_entity, TrackerErrorCode::E1006)
                        .arg(&attribute.attribute),
                );
                continue;
            };

            let Some(value) = attribute.value.as_deref() else {
                report.add_error_if(tracked_entity_type.is_mandatory(&tea.uid), || {
                    TrackerError::new(tracked_entity, TrackerErrorCode::E1076)
                        .arg("TrackedEntityAttribute")
                        .arg(&attribute.attribute)
                });
                continue;
            };

            Self::validate_value(report, ctx, tracked_entity, attribute, &tea, value);
        }
    }
}
