// ==========================================
// Tracker 导入管道 - 标识方案 (Identifier Scheme)
// ==========================================
// 职责: 每类元数据使用哪种标识（UID/CODE/NAME/ATTRIBUTE）引用
// ==========================================

use crate::domain::metadata::{IdentifiableObject, MetadataKind};
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 标识方案种类
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrackerIdScheme {
    #[default]
    Uid,
    Code,
    Name,
    Attribute, // 元数据属性值（需指定属性 uid）
}

impl fmt::Display for TrackerIdScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackerIdScheme::Uid => write!(f, "UID"),
            TrackerIdScheme::Code => write!(f, "CODE"),
            TrackerIdScheme::Name => write!(f, "NAME"),
            TrackerIdScheme::Attribute => write!(f, "ATTRIBUTE"),
        }
    }
}

// ==========================================
// TrackerIdentifier - 方案 + 方案参数
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrackerIdentifier {
    pub id_scheme: TrackerIdScheme,
    pub value: Option<String>, // ATTRIBUTE 方案下的属性 uid
}

impl TrackerIdentifier {
    pub const UID: TrackerIdentifier = TrackerIdentifier {
        id_scheme: TrackerIdScheme::Uid,
        value: None,
    };

    pub const CODE: TrackerIdentifier = TrackerIdentifier {
        id_scheme: TrackerIdScheme::Code,
        value: None,
    };

    pub const NAME: TrackerIdentifier = TrackerIdentifier {
        id_scheme: TrackerIdScheme::Name,
        value: None,
    };

    pub fn attribute(attribute_uid: impl Into<String>) -> Self {
        Self {
            id_scheme: TrackerIdScheme::Attribute,
            value: Some(attribute_uid.into()),
        }
    }

    /// 按本方案取对象的标识
    ///
    /// # 返回
    /// - None: 对象在该方案下无标识（如 CODE 为空）
    pub fn identify<T: IdentifiableObject + ?Sized>(&self, object: &T) -> Option<String> {
        let id = match self.id_scheme {
            TrackerIdScheme::Uid => Some(object.uid()),
            TrackerIdScheme::Code => object.code(),
            TrackerIdScheme::Name => Some(object.name()),
            TrackerIdScheme::Attribute => self
                .value
                .as_deref()
                .and_then(|attr| object.attribute_value(attr)),
        };
        id.filter(|id| !id.is_empty()).map(str::to_string)
    }
}

impl fmt::Display for TrackerIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}:{}", self.id_scheme, value),
            None => write!(f, "{}", self.id_scheme),
        }
    }
}

// ==========================================
// TrackerIdentifierParams - 各元数据种类的标识方案
// ==========================================
// 未单独指定的种类使用 id_scheme
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrackerIdentifierParams {
    pub id_scheme: TrackerIdentifier,
    pub org_unit_id_scheme: TrackerIdentifier,
    pub program_id_scheme: TrackerIdentifier,
    pub program_stage_id_scheme: TrackerIdentifier,
    pub data_element_id_scheme: TrackerIdentifier,
    pub category_option_combo_id_scheme: TrackerIdentifier,
    pub category_option_id_scheme: TrackerIdentifier,
}

impl TrackerIdentifierParams {
    /// 取某元数据种类对应的标识方案
    pub fn identifier_for(&self, kind: MetadataKind) -> &TrackerIdentifier {
        match kind {
            MetadataKind::OrganisationUnit => &self.org_unit_id_scheme,
            MetadataKind::Program => &self.program_id_scheme,
            MetadataKind::ProgramStage => &self.program_stage_id_scheme,
            MetadataKind::DataElement => &self.data_element_id_scheme,
            MetadataKind::CategoryOptionCombo => &self.category_option_combo_id_scheme,
            MetadataKind::CategoryOption => &self.category_option_id_scheme,
            _ => &self.id_scheme,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::metadata::OrganisationUnit;

    fn org_unit() -> OrganisationUnit {
        let mut ou = OrganisationUnit {
            uid: "OU00000001a".to_string(),
            code: Some("OU_A".to_string()),
            name: "Clinic A".to_string(),
            ..Default::default()
        };
        ou.attribute_values
            .insert("ATTRSCHEME1".to_string(), "EXT-01".to_string());
        ou
    }

    #[test]
    fn test_identify_by_scheme() {
        let ou = org_unit();
        assert_eq!(TrackerIdentifier::UID.identify(&ou).as_deref(), Some("OU00000001a"));
        assert_eq!(TrackerIdentifier::CODE.identify(&ou).as_deref(), Some("OU_A"));
        assert_eq!(TrackerIdentifier::NAME.identify(&ou).as_deref(), Some("Clinic A"));
        assert_eq!(
            TrackerIdentifier::attribute("ATTRSCHEME1")
                .identify(&ou)
                .as_deref(),
            Some("EXT-01")
        );
    }

    #[test]
    fn test_identify_missing_code() {
        let mut ou = org_unit();
        ou.code = None;
        assert!(TrackerIdentifier::CODE.identify(&ou).is_none());
    }

    #[test]
    fn test_identifier_for_falls_back_to_default() {
        let params = TrackerIdentifierParams {
            id_scheme: TrackerIdentifier::CODE,
            org_unit_id_scheme: TrackerIdentifier::NAME,
            ..Default::default()
        };

        assert_eq!(
            params.identifier_for(MetadataKind::OrganisationUnit),
            &TrackerIdentifier::NAME
        );
        assert_eq!(
            params.identifier_for(MetadataKind::RelationshipType),
            &TrackerIdentifier::CODE
        );
        assert_eq!(
            params.identifier_for(MetadataKind::Program),
            &TrackerIdentifier::UID
        );
    }
}
