// ==========================================
// Tracker 导入管道 - 值类型内容校验
// ==========================================
// 职责: 校验字符串值是否符合声明的值类型
// 返回: None = 合法；Some(原因键) = 不合法
// ==========================================

use crate::domain::types::ValueType;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use std::sync::LazyLock;

/// 文本值最大长度
pub const VALUE_MAX_LENGTH: usize = 50_000;

static UID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9]{10}$").expect("valid regex"));

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid regex")
});

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9+\(\)#\.\s/ext-]{6,50}$").expect("valid regex"));

static TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([01]?[0-9]|2[0-3]):[0-5][0-9]$").expect("valid regex"));

static COORDINATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[\s*-?\d+(\.\d+)?\s*,\s*-?\d+(\.\d+)?\s*\]$").expect("valid regex")
});

/// uid 格式: 11 位，首位字母，其余字母数字
pub fn is_valid_uid(uid: &str) -> bool {
    UID_RE.is_match(uid)
}

/// 校验值与值类型是否匹配
///
/// # 返回
/// - None: 合法
/// - Some(key): 不合法原因
pub fn data_value_is_valid(value: &str, value_type: ValueType) -> Option<&'static str> {
    if value.chars().count() > VALUE_MAX_LENGTH {
        return Some("value_length_greater_than_max_length");
    }

    let trimmed = value.trim();
    match value_type {
        ValueType::Text | ValueType::LongText | ValueType::Username => None,
        ValueType::Letter => {
            let mut chars = trimmed.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_alphabetic() => None,
                _ => Some("value_not_valid_letter"),
            }
        }
        ValueType::Number => trimmed
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map_or(Some("value_not_numeric"), |_| None),
        ValueType::UnitInterval => match trimmed.parse::<f64>() {
            Ok(n) if (0.0..=1.0).contains(&n) => None,
            _ => Some("value_not_unit_interval"),
        },
        ValueType::Percentage => match trimmed.parse::<f64>() {
            Ok(n) if (0.0..=100.0).contains(&n) => None,
            _ => Some("value_not_percentage"),
        },
        ValueType::Integer => trimmed
            .parse::<i64>()
            .map_or(Some("value_not_integer"), |_| None),
        ValueType::IntegerPositive => match trimmed.parse::<i64>() {
            Ok(n) if n > 0 => None,
            _ => Some("value_not_positive_integer"),
        },
        ValueType::IntegerNegative => match trimmed.parse::<i64>() {
            Ok(n) if n < 0 => None,
            _ => Some("value_not_negative_integer"),
        },
        ValueType::IntegerZeroOrPositive => match trimmed.parse::<i64>() {
            Ok(n) if n >= 0 => None,
            _ => Some("value_not_zero_or_positive_integer"),
        },
        ValueType::Boolean => match trimmed {
            "true" | "false" | "1" | "0" => None,
            _ => Some("value_not_bool"),
        },
        ValueType::TrueOnly => match trimmed {
            "true" | "1" => None,
            _ => Some("value_not_true_only"),
        },
        ValueType::Date | ValueType::Age => {
            let valid = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").is_ok()
                || parse_datetime(trimmed);
            (!valid).then_some("value_not_valid_date")
        }
        ValueType::Datetime => (!parse_datetime(trimmed)).then_some("value_not_valid_datetime"),
        ValueType::Time => (!TIME_RE.is_match(trimmed)).then_some("value_not_valid_time"),
        ValueType::Email => (!EMAIL_RE.is_match(trimmed)).then_some("value_not_valid_email"),
        ValueType::PhoneNumber => {
            (!PHONE_RE.is_match(trimmed)).then_some("value_not_valid_phone_number")
        }
        ValueType::Coordinate => {
            (!COORDINATE_RE.is_match(trimmed)).then_some("value_not_coordinate")
        }
        ValueType::Url => {
            let valid = trimmed.starts_with("http://") || trimmed.starts_with("https://");
            (!valid).then_some("value_not_url")
        }
        ValueType::File | ValueType::Image => {
            (!is_valid_uid(trimmed)).then_some("value_not_valid_file_resource_uid")
        }
        ValueType::OrganisationUnit | ValueType::TrackerAssociate => {
            (!is_valid_uid(trimmed)).then_some("value_not_valid_uid")
        }
    }
}

fn parse_datetime(value: &str) -> bool {
    DateTime::parse_from_rfc3339(value).is_ok()
        || NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
        || NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S").is_ok()
        || NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M").is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uid_format() {
        assert!(is_valid_uid("a1234567890"));
        assert!(is_valid_uid("PROG000001a"));
        assert!(!is_valid_uid("1abcdefghij"));
        assert!(!is_valid_uid("short"));
        assert!(!is_valid_uid("abcdefghij-"));
    }

    #[test]
    fn test_numeric_types() {
        assert_eq!(data_value_is_valid("12.5", ValueType::Number), None);
        assert_eq!(
            data_value_is_valid("abc", ValueType::Number),
            Some("value_not_numeric")
        );
        assert_eq!(data_value_is_valid("0.3", ValueType::UnitInterval), None);
        assert_eq!(
            data_value_is_valid("1.3", ValueType::UnitInterval),
            Some("value_not_unit_interval")
        );
        assert_eq!(
            data_value_is_valid("0", ValueType::IntegerPositive),
            Some("value_not_positive_integer")
        );
        assert_eq!(data_value_is_valid("0", ValueType::IntegerZeroOrPositive), None);
        assert_eq!(data_value_is_valid("-4", ValueType::IntegerNegative), None);
    }

    #[test]
    fn test_boolean_and_dates() {
        assert_eq!(data_value_is_valid("true", ValueType::Boolean), None);
        assert_eq!(
            data_value_is_valid("false", ValueType::TrueOnly),
            Some("value_not_true_only")
        );
        assert_eq!(data_value_is_valid("2020-01-31", ValueType::Date), None);
        assert_eq!(
            data_value_is_valid("2020-02-31", ValueType::Date),
            Some("value_not_valid_date")
        );
        assert_eq!(
            data_value_is_valid("2020-01-31T10:00:00Z", ValueType::Datetime),
            None
        );
        assert_eq!(data_value_is_valid("23:59", ValueType::Time), None);
        assert_eq!(
            data_value_is_valid("24:00", ValueType::Time),
            Some("value_not_valid_time")
        );
    }

    #[test]
    fn test_text_like_types() {
        assert_eq!(data_value_is_valid("a@b.org", ValueType::Email), None);
        assert_eq!(
            data_value_is_valid("not-an-email", ValueType::Email),
            Some("value_not_valid_email")
        );
        assert_eq!(data_value_is_valid("Z", ValueType::Letter), None);
        assert_eq!(
            data_value_is_valid("ZZ", ValueType::Letter),
            Some("value_not_valid_letter")
        );
        assert_eq!(data_value_is_valid("[10.5, -3.2]", ValueType::Coordinate), None);
        assert_eq!(
            data_value_is_valid("FILE000001a", ValueType::File),
            None
        );
    }
}
