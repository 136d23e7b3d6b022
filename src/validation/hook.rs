// ==========================================
// Tracker 导入管道 - 校验钩子 Trait
// ==========================================
// 职责: 定义按对象类型的校验入口
// 约定: 问题写入 ValidationReport，不返回 Rust 错误
// ==========================================

use crate::domain::tracker::{Enrollment, Event, Relationship, TrackedEntity};
use crate::validation::context::ValidationContext;
use crate::validation::report::ValidationReport;

// ==========================================
// ValidationHook Trait
// ==========================================
// 未覆写的类型入口为空操作
pub trait ValidationHook: Send + Sync {
    /// 钩子名称（日志用）
    fn name(&self) -> &'static str;

    fn validate_tracked_entity(
        &self,
        _report: &mut ValidationReport,
        _ctx: &ValidationContext<'_>,
        _tracked_entity: &TrackedEntity,
    ) {
    }

    fn validate_enrollment(
        &self,
        _report: &mut ValidationReport,
        _ctx: &ValidationContext<'_>,
        _enrollment: &Enrollment,
    ) {
    }

    /// 事件入口可回写推导出的 AOC
    fn validate_event(
        &self,
        _report: &mut ValidationReport,
        _ctx: &ValidationContext<'_>,
        _event: &mut Event,
    ) {
    }

    fn validate_relationship(
        &self,
        _report: &mut ValidationReport,
        _ctx: &ValidationContext<'_>,
        _relationship: &Relationship,
    ) {
    }

    /// 出错对象是否从后续钩子与落库中剔除
    fn remove_on_error(&self) -> bool {
        false
    }
}
