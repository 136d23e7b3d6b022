// 单元测试共用的元数据场景
//
// OU00000001a 分配给两个项目；OU00000002a 未分配
// PROG000001a 需登记（默认类别组合）；PROG000002a 无登记（非默认类别组合）

use crate::config::ValidationSettings;
use crate::domain::metadata::*;
use crate::domain::tracker::{Attribute, Enrollment, Event, TrackedEntity};
use crate::domain::types::{ProgramType, RelationshipEntity, ValueType};
use crate::domain::identifiers::TrackerIdentifierParams;
use crate::domain::tracker::TrackerBundle;
use crate::preheat::{PreheatSnapshot, TrackerPreheat};
use crate::resolver::{AttributeOptionComboCache, BatchIndex, InMemoryCategoryService};
use crate::validation::context::ValidationContext;
use std::collections::HashMap;

pub fn attribute(uid: &str, value_type: ValueType) -> TrackedEntityAttribute {
    TrackedEntityAttribute {
        uid: uid.to_string(),
        code: None,
        name: uid.to_string(),
        attribute_values: HashMap::new(),
        value_type,
        confidential: false,
        option_set: None,
    }
}

fn program(uid: &str, program_type: ProgramType, category_combo: &str, stage: &str) -> Program {
    Program {
        uid: uid.to_string(),
        code: None,
        name: uid.to_string(),
        attribute_values: HashMap::new(),
        program_type,
        category_combo: category_combo.to_string(),
        tracked_entity_type: (program_type == ProgramType::WithRegistration)
            .then(|| "TET0000001a".to_string()),
        program_stages: vec![stage.to_string()],
        organisation_units: vec!["OU00000001a".to_string()],
        attributes: vec!["ATTR000001a".to_string(), "ATTR000002a".to_string()],
        program_indicators: Vec::new(),
    }
}

pub fn snapshot() -> PreheatSnapshot {
    let mut confidential = attribute("ATTR000004a", ValueType::Text);
    confidential.confidential = true;
    let mut with_options = attribute("ATTR000005a", ValueType::Text);
    with_options.option_set = Some(OptionSet {
        uid: "OS00000001a".to_string(),
        options: vec!["A".to_string(), "B".to_string()],
    });

    let mut te_constraint = RelationshipConstraint::of(RelationshipEntity::TrackedEntityInstance);
    te_constraint.tracked_entity_type = Some("TET0000001a".to_string());
    let mut en_constraint = RelationshipConstraint::of(RelationshipEntity::ProgramInstance);
    en_constraint.program = Some("PROG000001a".to_string());

    PreheatSnapshot {
        organisation_units: vec![
            OrganisationUnit {
                uid: "OU00000001a".to_string(),
                code: Some("OU_A".to_string()),
                ..Default::default()
            },
            OrganisationUnit {
                uid: "OU00000002a".to_string(),
                ..Default::default()
            },
        ],
        programs: vec![
            program(
                "PROG000001a",
                ProgramType::WithRegistration,
                "DEFCC00001a",
                "PS00000001a",
            ),
            program(
                "PROG000002a",
                ProgramType::WithoutRegistration,
                "CC00000001a",
                "PS00000002a",
            ),
        ],
        program_stages: vec![
            ProgramStage {
                uid: "PS00000001a".to_string(),
                program: "PROG000001a".to_string(),
                ..Default::default()
            },
            ProgramStage {
                uid: "PS00000002a".to_string(),
                program: "PROG000002a".to_string(),
                ..Default::default()
            },
        ],
        tracked_entity_types: vec![
            TrackedEntityType {
                uid: "TET0000001a".to_string(),
                tracked_entity_type_attributes: vec![
                    TrackedEntityTypeAttribute {
                        tracked_entity_attribute: "ATTR000001a".to_string(),
                        mandatory: true,
                    },
                    TrackedEntityTypeAttribute {
                        tracked_entity_attribute: "ATTR000002a".to_string(),
                        mandatory: false,
                    },
                ],
                ..Default::default()
            },
            TrackedEntityType {
                uid: "TET0000002a".to_string(),
                ..Default::default()
            },
        ],
        tracked_entity_attributes: vec![
            attribute("ATTR000001a", ValueType::Text),
            attribute("ATTR000002a", ValueType::Integer),
            attribute("ATTR000003a", ValueType::File),
            confidential,
            with_options,
        ],
        category_options: ["DEFCO00001a", "CO00000001a", "CO00000002a"]
            .iter()
            .map(|uid| CategoryOption {
                uid: uid.to_string(),
                ..Default::default()
            })
            .collect(),
        category_combos: vec![
            CategoryCombo {
                uid: "DEFCC00001a".to_string(),
                is_default: true,
                category_options: vec!["DEFCO00001a".to_string()],
                ..Default::default()
            },
            CategoryCombo {
                uid: "CC00000001a".to_string(),
                category_options: vec!["CO00000001a".to_string(), "CO00000002a".to_string()],
                ..Default::default()
            },
        ],
        category_option_combos: aocs(),
        relationship_types: vec![
            RelationshipType {
                uid: "RT00000001a".to_string(),
                code: None,
                name: "te-te".to_string(),
                attribute_values: HashMap::new(),
                bidirectional: false,
                from_constraint: te_constraint.clone(),
                to_constraint: te_constraint,
            },
            RelationshipType {
                uid: "RT00000002a".to_string(),
                code: None,
                name: "enrollment-event".to_string(),
                attribute_values: HashMap::new(),
                bidirectional: true,
                from_constraint: en_constraint,
                to_constraint: RelationshipConstraint::of(RelationshipEntity::ProgramStageInstance),
            },
        ],
        tracked_entities: vec![TrackedEntityInstance {
            uid: "TE00000009a".to_string(),
            tracked_entity_type: "TET0000001a".to_string(),
            org_unit: "OU00000001a".to_string(),
            attribute_values: HashMap::from([(
                "ATTR000003a".to_string(),
                "FILE000002a".to_string(),
            )]),
        }],
        enrollments: vec![ProgramInstance {
            uid: "EN00000009a".to_string(),
            program: "PROG000001a".to_string(),
            tracked_entity: "TE00000009a".to_string(),
            org_unit: "OU00000001a".to_string(),
        }],
        events: vec![ProgramStageInstance {
            uid: "EV00000009a".to_string(),
            program_stage: "PS00000001a".to_string(),
            enrollment: Some("EN00000009a".to_string()),
            attribute_option_combo: None,
        }],
        file_resources: vec![
            FileResource {
                uid: "FILE000001a".to_string(),
                assigned: false,
            },
            FileResource {
                uid: "FILE000002a".to_string(),
                assigned: true,
            },
        ],
        ..Default::default()
    }
}

pub fn aocs() -> Vec<CategoryOptionCombo> {
    vec![
        CategoryOptionCombo {
            uid: "DEFAOC0001a".to_string(),
            category_combo: "DEFCC00001a".to_string(),
            category_options: vec!["DEFCO00001a".to_string()],
            ..Default::default()
        },
        CategoryOptionCombo {
            uid: "AOC0000001a".to_string(),
            category_combo: "CC00000001a".to_string(),
            category_options: vec!["CO00000001a".to_string()],
            ..Default::default()
        },
        CategoryOptionCombo {
            uid: "AOC0000002a".to_string(),
            category_combo: "CC00000001a".to_string(),
            category_options: vec!["CO00000002a".to_string()],
            ..Default::default()
        },
    ]
}

pub fn preheat() -> TrackerPreheat {
    TrackerPreheat::from_snapshot(snapshot(), TrackerIdentifierParams::default())
}

pub fn tracked_entity(uid: &str) -> TrackedEntity {
    TrackedEntity {
        tracked_entity: uid.to_string(),
        tracked_entity_type: "TET0000001a".to_string(),
        org_unit: "OU00000001a".to_string(),
        attributes: vec![Attribute {
            attribute: "ATTR000001a".to_string(),
            value: Some("Jane".to_string()),
            value_type: None,
        }],
        ..Default::default()
    }
}

pub fn enrollment(uid: &str, te: &str) -> Enrollment {
    Enrollment {
        enrollment: uid.to_string(),
        tracked_entity: te.to_string(),
        program: "PROG000001a".to_string(),
        org_unit: "OU00000001a".to_string(),
        ..Default::default()
    }
}

pub fn event(uid: &str, enrollment: Option<&str>) -> Event {
    Event {
        event: uid.to_string(),
        enrollment: enrollment.map(str::to_string),
        program: "PROG000001a".to_string(),
        program_stage: "PS00000001a".to_string(),
        org_unit: "OU00000001a".to_string(),
        ..Default::default()
    }
}

/// 持有构建 ValidationContext 所需的全部数据
pub struct Fixture {
    pub preheat: TrackerPreheat,
    pub batch: BatchIndex,
    pub settings: ValidationSettings,
    pub category_service: InMemoryCategoryService,
    pub cache: AttributeOptionComboCache,
}

impl Fixture {
    pub fn new(bundle: &TrackerBundle) -> Self {
        Self {
            preheat: preheat(),
            batch: BatchIndex::from_bundle(bundle),
            settings: ValidationSettings::default(),
            category_service: InMemoryCategoryService::new(aocs()),
            cache: AttributeOptionComboCache::new(),
        }
    }

    pub fn context(&self) -> ValidationContext<'_> {
        ValidationContext::new(
            &self.preheat,
            &self.batch,
            &self.settings,
            &self.category_service,
            &self.cache,
        )
    }
}
