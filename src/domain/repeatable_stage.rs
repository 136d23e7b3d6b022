// ==========================================
// Tracker 导入管道 - 可重复阶段参数
// ==========================================
// 职责: 维度表达式方括号后缀解析出的取值窗口（起始下标/数量/日期区间）
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 数量哨兵值: 取全部
pub const COUNT_ALL: i32 = i32::MAX;

// ==========================================
// RepeatableStageParams - 可重复阶段参数（值对象）
// ==========================================
// 相等性: 四个字段逐一比较，None 只与 None 相等
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepeatableStageParams {
    start_index: i32,
    count: i32,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
}

impl RepeatableStageParams {
    pub fn new(
        start_index: i32,
        count: i32,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Self {
        Self {
            start_index,
            count,
            start_date,
            end_date,
        }
    }

    /// `[*]`: 全部
    pub fn all() -> Self {
        Self::new(0, COUNT_ALL, None, None)
    }

    /// `[n]`: 单个下标
    pub fn single(start_index: i32) -> Self {
        Self::new(start_index, 1, None, None)
    }

    pub fn start_index(&self) -> i32 {
        self.start_index
    }

    pub fn count(&self) -> i32 {
        self.count
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }

    pub fn count_all(&self) -> bool {
        self.count == COUNT_ALL
    }

    /// 是否只取一个值（无日期窗口）
    pub fn simple_stage_value_expected(&self) -> bool {
        self.count == 1 && self.start_date.is_none() && self.end_date.is_none()
    }
}

impl fmt::Display for RepeatableStageParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = if self.count_all() {
            "all".to_string()
        } else {
            self.count.to_string()
        };
        write!(
            f,
            "startIndex:{} count:{} startDate:{} endDate:{}",
            self.start_index,
            count,
            self.start_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "null".to_string()),
            self.end_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "null".to_string()),
        )
    }
}
