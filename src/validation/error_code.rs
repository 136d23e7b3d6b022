// ==========================================
// Tracker 导入管道 - 校验错误码
// ==========================================
// 职责: 闭集错误码及其消息模板（{0}/{1}/{2} 为位置参数）
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TrackerErrorCode {
    E1005,
    E1006,
    E1009,
    E1010,
    E1011,
    E1013,
    E1014,
    E1022,
    E1029,
    E1033,
    E1041,
    E1048,
    E1049,
    E1054,
    E1055,
    E1068,
    E1069,
    E1070,
    E1076,
    E1077,
    E1079,
    E1084,
    E1085,
    E1089,
    E1090,
    E1112,
    E1115,
    E1116,
    E1117,
    E1125,
    E1130,
    E4000,
    E4006,
    E4010,
    E4012,
    E4014,
    E4015,
}

impl TrackerErrorCode {
    /// 消息模板
    pub fn message_template(&self) -> &'static str {
        use TrackerErrorCode::*;
        match self {
            E1005 => "Could not find TrackedEntityType: `{0}`.",
            E1006 => "Attribute: `{0}`, does not exist.",
            E1009 => "File resource: `{0}`, has already been assigned to a different object.",
            E1010 => "Could not find Program: `{0}`, linked to Event.",
            E1011 => "Could not find OrganisationUnit: `{0}`, linked to Event.",
            E1013 => "Could not find ProgramStage: `{0}`, linked to Event.",
            E1014 => "Provided Program: `{0}`, is a Program without registration. An Enrollment cannot be created into Program without registration.",
            E1022 => "TrackedEntity: `{0}`, must have same TrackedEntityType as Program `{1}`.",
            E1029 => "Event OrganisationUnit: `{0}`, and Program: `{1}`, don't match.",
            E1033 => "Event: `{0}`, Enrollment value is NULL.",
            E1041 => "Enrollment OrganisationUnit: `{0}`, and Program: `{1}`, don't match.",
            E1048 => "Object: `{0}`, uid: `{1}`, has an invalid uid format.",
            E1049 => "Could not find OrganisationUnit: `{0}`, linked to Tracked Entity.",
            E1054 => "AttributeOptionCombo `{0}` is not in the event programs category combo `{1}`.",
            E1055 => "Default AttributeOptionCombo is not allowed since program has non-default CategoryCombo.",
            E1068 => "Could not find TrackedEntity: `{0}`, linked to Enrollment.",
            E1069 => "Could not find Program: `{0}`, linked to Enrollment.",
            E1070 => "Could not find OrganisationUnit: `{0}`, linked to Enrollment.",
            E1076 => "`{0}` `{1}` is mandatory and can't be null.",
            E1077 => "Attribute: `{0}`, text value exceed the maximum allowed length: `{1}`.",
            E1079 => "Event: `{0}`, Program: `{1}` is different from program defined in Enrollment `{2}`.",
            E1084 => "File resource: `{0}`, reference could not be found.",
            E1085 => "Attribute: `{0}`, value does not match value type: `{1}`.",
            E1089 => "Event: `{0}`, references a Program Stage `{1}` that does not belong to Program `{2}`.",
            E1090 => "Attribute: `{0}`, is mandatory in tracked entity type `{1}` but not declared in tracked entity `{2}`.",
            E1112 => "Attribute value: `{0}`, is set to confidential but system is not properly configured to encrypt data.",
            E1115 => "Could not find CategoryOptionCombo: `{0}`.",
            E1116 => "Could not find CategoryOption: `{0}`.",
            E1117 => "CategoryOptions `{0}` do not match CategoryOptionCombo or CategoryCombo `{1}`.",
            E1125 => "Value: `{0}`, is not a valid option for attribute `{1}` in option set `{2}`.",
            E1130 => "Duplicate uid: `{1}` found for {0} within the same payload.",
            E4000 => "Relationship: `{0}` cannot link to itself.",
            E4006 => "Could not find relationship Type: `{0}`.",
            E4010 => "Relationship Type `{0}` constraint requires a {1} but a {2} was found.",
            E4012 => "Could not find `{0}`: `{1}`, linked to Relationship.",
            E4014 => "Relationship Type `{0}` constraint requires a Tracked Entity having type `{1}` but `{2}` was found.",
            E4015 => "Relationship Type `{0}` constraint requires an Enrollment in Program `{1}` but `{2}` was found.",
        }
    }

    /// 以位置参数填充模板
    pub fn format(&self, args: &[String]) -> String {
        args.iter()
            .enumerate()
            .fold(self.message_template().to_string(), |msg, (i, arg)| {
                msg.replace(&format!("{{{}}}", i), arg)
            })
    }
}

impl fmt::Display for TrackerErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
