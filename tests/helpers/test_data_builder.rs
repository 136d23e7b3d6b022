// ==========================================
// 测试数据构建器
// ==========================================
// 职责: 标准预热场景 + 导入对象的流式构建
// 场景:
//   OU00000001a 分配给 PROG000001a（需登记）和 PROG000002a（无登记）
//   TET0000001a: ATTR000001a 必填，ATTR000002a 可选
//   RT00000001a: 跟踪实体 → 跟踪实体；RT00000002a: 登记 → 事件（双向）
// ==========================================

use std::collections::HashMap;
use tracker_import::domain::{
    Attribute, CategoryCombo, CategoryOption, CategoryOptionCombo, DataElement, Enrollment, Event,
    OrganisationUnit, Program, ProgramStage, ProgramType, Relationship, RelationshipConstraint,
    RelationshipEntity, RelationshipItem, RelationshipType, TrackedEntity,
    TrackedEntityAttribute, TrackedEntityInstance, TrackedEntityType, TrackedEntityTypeAttribute,
    TrackerIdentifierParams, ValueType,
};
use tracker_import::{PreheatSnapshot, TrackerBundle};

// ==========================================
// 预热快照
// ==========================================

fn tracked_entity_attribute(uid: &str, value_type: ValueType) -> TrackedEntityAttribute {
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

fn program(
    uid: &str,
    program_type: ProgramType,
    category_combo: &str,
    stage: &str,
) -> Program {
    Program {
        uid: uid.to_string(),
        code: Some(format!("{}_CODE", uid)),
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

fn constraint(entity: RelationshipEntity) -> RelationshipConstraint {
    RelationshipConstraint::of(entity)
}

/// 标准预热快照
pub fn standard_snapshot() -> PreheatSnapshot {
    let mut te_constraint = constraint(RelationshipEntity::TrackedEntityInstance);
    te_constraint.tracked_entity_type = Some("TET0000001a".to_string());

    PreheatSnapshot {
        organisation_units: vec![
            OrganisationUnit {
                uid: "OU00000001a".to_string(),
                code: Some("OU_A".to_string()),
                name: "Clinic A".to_string(),
                ..Default::default()
            },
            OrganisationUnit {
                uid: "OU00000002a".to_string(),
                code: Some("OU_B".to_string()),
                name: "Clinic B".to_string(),
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
                repeatable: true,
                data_elements: vec!["DE00000001a".to_string()],
                ..Default::default()
            },
            ProgramStage {
                uid: "PS00000002a".to_string(),
                program: "PROG000002a".to_string(),
                ..Default::default()
            },
        ],
        tracked_entity_types: vec![TrackedEntityType {
            uid: "TET0000001a".to_string(),
            name: "Person".to_string(),
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
        }],
        tracked_entity_attributes: vec![
            tracked_entity_attribute("ATTR000001a", ValueType::Text),
            tracked_entity_attribute("ATTR000002a", ValueType::Integer),
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
        category_option_combos: standard_option_combos(),
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
                from_constraint: constraint(RelationshipEntity::ProgramInstance),
                to_constraint: constraint(RelationshipEntity::ProgramStageInstance),
            },
        ],
        data_elements: vec![DataElement {
            uid: "DE00000001a".to_string(),
            code: None,
            name: "Weight".to_string(),
            attribute_values: HashMap::new(),
            value_type: ValueType::Number,
        }],
        tracked_entities: vec![TrackedEntityInstance {
            uid: "TE00000009a".to_string(),
            tracked_entity_type: "TET0000001a".to_string(),
            org_unit: "OU00000001a".to_string(),
            attribute_values: HashMap::new(),
        }],
        ..Default::default()
    }
}

/// 标准属性选项组合（默认 + 两个非默认）
pub fn standard_option_combos() -> Vec<CategoryOptionCombo> {
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

// ==========================================
// TrackedEntityBuilder
// ==========================================
pub struct TrackedEntityBuilder {
    te: TrackedEntity,
}

impl TrackedEntityBuilder {
    /// 默认: TET0000001a / OU00000001a，必填属性 ATTR000001a 已填
    pub fn new(uid: &str) -> Self {
        Self {
            te: TrackedEntity {
                tracked_entity: uid.to_string(),
                tracked_entity_type: "TET0000001a".to_string(),
                org_unit: "OU00000001a".to_string(),
                attributes: vec![Attribute {
                    attribute: "ATTR000001a".to_string(),
                    value: Some("Jane".to_string()),
                    value_type: None,
                }],
                ..Default::default()
            },
        }
    }

    pub fn org_unit(mut self, org_unit: &str) -> Self {
        self.te.org_unit = org_unit.to_string();
        self
    }

    pub fn tracked_entity_type(mut self, tet: &str) -> Self {
        self.te.tracked_entity_type = tet.to_string();
        self
    }

    pub fn attribute(mut self, attribute: &str, value: Option<&str>) -> Self {
        self.te.attributes.push(Attribute {
            attribute: attribute.to_string(),
            value: value.map(str::to_string),
            value_type: None,
        });
        self
    }

    pub fn without_attributes(mut self) -> Self {
        self.te.attributes.clear();
        self
    }

    pub fn build(self) -> TrackedEntity {
        self.te
    }
}

// ==========================================
// EnrollmentBuilder
// ==========================================
pub struct EnrollmentBuilder {
    enrollment: Enrollment,
}

impl EnrollmentBuilder {
    pub fn new(uid: &str, tracked_entity: &str) -> Self {
        Self {
            enrollment: Enrollment {
                enrollment: uid.to_string(),
                tracked_entity: tracked_entity.to_string(),
                program: "PROG000001a".to_string(),
                org_unit: "OU00000001a".to_string(),
                ..Default::default()
            },
        }
    }

    pub fn program(mut self, program: &str) -> Self {
        self.enrollment.program = program.to_string();
        self
    }

    pub fn org_unit(mut self, org_unit: &str) -> Self {
        self.enrollment.org_unit = org_unit.to_string();
        self
    }

    pub fn build(self) -> Enrollment {
        self.enrollment
    }
}

// ==========================================
// EventBuilder
// ==========================================
pub struct EventBuilder {
    event: Event,
}

impl EventBuilder {
    /// 默认: PROG000001a / PS00000001a / OU00000001a
    pub fn new(uid: &str) -> Self {
        Self {
            event: Event {
                event: uid.to_string(),
                program: "PROG000001a".to_string(),
                program_stage: "PS00000001a".to_string(),
                org_unit: "OU00000001a".to_string(),
                ..Default::default()
            },
        }
    }

    /// 无登记项目下的事件
    pub fn without_registration(uid: &str) -> Self {
        Self::new(uid).program("PROG000002a").program_stage("PS00000002a")
    }

    pub fn enrollment(mut self, enrollment: &str) -> Self {
        self.event.enrollment = Some(enrollment.to_string());
        self
    }

    pub fn program(mut self, program: &str) -> Self {
        self.event.program = program.to_string();
        self
    }

    pub fn program_stage(mut self, stage: &str) -> Self {
        self.event.program_stage = stage.to_string();
        self
    }

    pub fn org_unit(mut self, org_unit: &str) -> Self {
        self.event.org_unit = org_unit.to_string();
        self
    }

    pub fn attribute_option_combo(mut self, aoc: &str) -> Self {
        self.event.attribute_option_combo = Some(aoc.to_string());
        self
    }

    pub fn attribute_category_options(mut self, cos: &str) -> Self {
        self.event.attribute_category_options = Some(cos.to_string());
        self
    }

    pub fn build(self) -> Event {
        self.event
    }
}

// ==========================================
// RelationshipBuilder
// ==========================================
pub struct RelationshipBuilder {
    relationship: Relationship,
}

impl RelationshipBuilder {
    /// 默认: RT00000001a，两端均为跟踪实体
    pub fn new(uid: &str, from: &str, to: &str) -> Self {
        Self {
            relationship: Relationship {
                relationship: uid.to_string(),
                relationship_type: Some("RT00000001a".to_string()),
                from: RelationshipItem::TrackedEntity(from.to_string()),
                to: RelationshipItem::TrackedEntity(to.to_string()),
                bidirectional: false,
            },
        }
    }

    pub fn relationship_type(mut self, rt: Option<&str>) -> Self {
        self.relationship.relationship_type = rt.map(str::to_string);
        self
    }

    pub fn from(mut self, item: RelationshipItem) -> Self {
        self.relationship.from = item;
        self
    }

    pub fn to(mut self, item: RelationshipItem) -> Self {
        self.relationship.to = item;
        self
    }

    pub fn build(self) -> Relationship {
        self.relationship
    }
}

// ==========================================
// BundleBuilder
// ==========================================
#[derive(Default)]
pub struct BundleBuilder {
    bundle: TrackerBundle,
}

impl BundleBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tracked_entity(mut self, te: TrackedEntity) -> Self {
        self.bundle.tracked_entities.push(te);
        self
    }

    pub fn enrollment(mut self, enrollment: Enrollment) -> Self {
        self.bundle.enrollments.push(enrollment);
        self
    }

    pub fn event(mut self, event: Event) -> Self {
        self.bundle.events.push(event);
        self
    }

    pub fn relationship(mut self, relationship: Relationship) -> Self {
        self.bundle.relationships.push(relationship);
        self
    }

    pub fn identifiers(mut self, identifiers: TrackerIdentifierParams) -> Self {
        self.bundle.identifiers = identifiers;
        self
    }

    pub fn build(self) -> TrackerBundle {
        self.bundle
    }
}
