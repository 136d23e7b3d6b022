// ==========================================
// Tracker 导入管道 - 维度表达式解析
// ==========================================
// 职责: 解析 `programStage.dataElement[参数]-legendSet` 形式的维度字符串
// 规则:
// 1. 按固定顺序尝试五种方括号后缀，首个在任意位置命中的模式生效
// 2. 去掉命中文本后按 '-' 取图例集，按 '.' 拆分 head / item
// 3. 日期或整数解析失败 → IllegalQueryError (E7227)
// ==========================================

use crate::domain::repeatable_stage::{RepeatableStageParams, COUNT_ALL};
use crate::resolver::error::{IllegalQueryError, QueryResult};
use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// 项目阶段分隔符
pub const PROGRAMSTAGE_SEP: &str = ".";

/// 图例集分隔符
pub const ITEM_SEP: &str = "-";

const DATE_FORMAT: &str = "%Y-%m-%d";

// ==========================================
// 方括号后缀模式
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StageParamPattern {
    Index,           // [n]
    Asterisk,        // [*]
    IndexCount,      // [n,c]
    IndexCountDates, // [n,c,from,to]
    Dates,           // [from,to]
}

const DATE_RE: &str = r"\d{4}\-(0[1-9]|1[012])\-(0[1-9]|[12][0-9]|3[01])";

static STAGE_PARAM_PATTERNS: LazyLock<Vec<(StageParamPattern, Regex)>> = LazyLock::new(|| {
    vec![
        (
            StageParamPattern::Index,
            Regex::new(r"\[-?\d+\]").expect("valid regex"),
        ),
        (
            StageParamPattern::Asterisk,
            Regex::new(r"\[\*\]").expect("valid regex"),
        ),
        (
            StageParamPattern::IndexCount,
            Regex::new(r"\[-?\d+,\s*\d+\]").expect("valid regex"),
        ),
        (
            StageParamPattern::IndexCountDates,
            Regex::new(&format!(r"\[-?\d+,\s*\d+,\s*{},\s*{}\]", DATE_RE, DATE_RE))
                .expect("valid regex"),
        ),
        (
            StageParamPattern::Dates,
            Regex::new(&format!(r"\[{},\s*{}\]", DATE_RE, DATE_RE)).expect("valid regex"),
        ),
    ]
});

/// 首个命中的模式及命中文本
fn match_stage_params(dimension: &str) -> Option<(StageParamPattern, &str)> {
    STAGE_PARAM_PATTERNS.iter().find_map(|(kind, re)| {
        re.find(dimension).map(|m| (*kind, m.as_str()))
    })
}

/// 去掉方括号参数后缀（命中文本全部替换）
pub fn remove_offset(dimension: &str) -> String {
    match match_stage_params(dimension) {
        Some((_, matched)) => dimension.replace(matched, ""),
        None => dimension.to_string(),
    }
}

/// 由方括号后缀推导可重复阶段参数
///
/// # 返回
/// - Ok(None): 无后缀
/// - Err(E7227): 日期/整数非法
pub fn repeatable_stage_params(dimension: &str) -> QueryResult<Option<RepeatableStageParams>> {
    let (kind, matched) = match match_stage_params(dimension) {
        Some(found) => found,
        None => return Ok(None),
    };

    let tokens: Vec<&str> = matched
        .trim_start_matches('[')
        .trim_end_matches(']')
        .split(',')
        .map(str::trim)
        .collect();

    let int = |token: &str| -> QueryResult<i32> {
        token
            .parse::<i32>()
            .map_err(|_| IllegalQueryError::InvalidRepeatableStageParams {
                dimension: dimension.to_string(),
            })
    };
    let date = |token: &str| -> QueryResult<NaiveDate> {
        NaiveDate::parse_from_str(token, DATE_FORMAT).map_err(|_| {
            IllegalQueryError::InvalidRepeatableStageParams {
                dimension: dimension.to_string(),
            }
        })
    };

    let params = match kind {
        StageParamPattern::Asterisk => RepeatableStageParams::all(),
        StageParamPattern::Index => RepeatableStageParams::single(int(tokens[0])?),
        StageParamPattern::IndexCount => {
            RepeatableStageParams::new(int(tokens[0])?, int(tokens[1])?, None, None)
        }
        StageParamPattern::IndexCountDates => RepeatableStageParams::new(
            int(tokens[0])?,
            int(tokens[1])?,
            Some(date(tokens[2])?),
            Some(date(tokens[3])?),
        ),
        StageParamPattern::Dates => RepeatableStageParams::new(
            0,
            COUNT_ALL,
            Some(date(tokens[0])?),
            Some(date(tokens[1])?),
        ),
    };

    Ok(Some(params))
}

// ==========================================
// ParsedDimension - 解析结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedDimension {
    pub dimension: String,    // 原始维度字符串
    pub head: Option<String>, // 项目阶段或关系类型标识
    pub item: String,         // 叶子标识（数据元/属性/指标）
    pub legend_set: Option<String>,
    pub repeatable_stage_params: Option<RepeatableStageParams>,
}

impl ParsedDimension {
    /// 是否为复合维度（含 '.'，head 必须可解析）
    pub fn is_compound(&self) -> bool {
        self.head.is_some()
    }
}

/// 解析维度字符串
///
/// # 示例
/// - "abc.def[2]" → head=abc, item=def, {startIndex=2, count=1}
/// - "def-LEGEND1" → head=None, item=def, legend_set=LEGEND1
pub fn parse_dimension(dimension: &str) -> QueryResult<ParsedDimension> {
    let stripped = remove_offset(dimension);
    let mut legend_split = stripped.split(ITEM_SEP);
    let element = legend_split.next().unwrap_or_default();
    let legend_set = legend_split
        .next()
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    // 至多一个 '.'，多段形式（a.b.c）无法定位
    let parts: Vec<&str> = element.split(PROGRAMSTAGE_SEP).collect();
    let (head, item) = match parts.as_slice() {
        [single] => (None, single.to_string()),
        [head, item] => (Some(head.to_string()), item.to_string()),
        _ => {
            return Err(IllegalQueryError::InvalidDimension {
                dimension: dimension.to_string(),
            })
        }
    };

    if item.is_empty() || head.as_deref() == Some("") {
        return Err(IllegalQueryError::InvalidDimension {
            dimension: dimension.to_string(),
        });
    }

    Ok(ParsedDimension {
        dimension: dimension.to_string(),
        head,
        item,
        legend_set,
        repeatable_stage_params: repeatable_stage_params(dimension)?,
    })
}
