// ==========================================
// Tracker 导入管道 - 查询项定位器
// ==========================================
// 职责: 将维度字符串定位为项目内的数据元 / 跟踪属性 / 项目指标
// 顺序: 数据元 → 跟踪属性 → 项目指标，均未命中 → E7224
// ==========================================

use crate::domain::metadata::{
    DataElement, IdentifiableObject, LegendSet, Program, ProgramIndicator, ProgramStage,
    RelationshipType, TrackedEntityAttribute,
};
use crate::domain::repeatable_stage::RepeatableStageParams;
use crate::domain::types::ValueType;
use crate::preheat::TrackerPreheat;
use crate::resolver::dimension::{parse_dimension, ParsedDimension};
use crate::resolver::error::{IllegalQueryError, QueryResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

// ==========================================
// 输出类型 (Event Output Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventOutputType {
    Event,
    Enrollment,
    TrackedEntityInstance,
}

// ==========================================
// QueryItem - 定位结果
// ==========================================
#[derive(Debug, Clone)]
pub enum QueryItemSource {
    DataElement(Arc<DataElement>),
    TrackedEntityAttribute(Arc<TrackedEntityAttribute>),
    ProgramIndicator(Arc<ProgramIndicator>),
}

impl QueryItemSource {
    pub fn uid(&self) -> &str {
        match self {
            QueryItemSource::DataElement(de) => de.uid(),
            QueryItemSource::TrackedEntityAttribute(tea) => tea.uid(),
            QueryItemSource::ProgramIndicator(pi) => pi.uid(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct QueryItem {
    pub item: QueryItemSource,
    pub program: String, // 项目 uid
    pub value_type: ValueType,
    pub legend_set: Option<Arc<LegendSet>>,
    pub program_stage: Option<Arc<ProgramStage>>,
    pub relationship_type: Option<Arc<RelationshipType>>,
    pub repeatable_stage_params: Option<RepeatableStageParams>,
}

impl QueryItem {
    fn new(item: QueryItemSource, program: &Program, value_type: ValueType) -> Self {
        Self {
            item,
            program: program.uid.clone(),
            value_type,
            legend_set: None,
            program_stage: None,
            relationship_type: None,
            repeatable_stage_params: None,
        }
    }
}

// head 标识解析结果
enum HeadObject {
    RelationshipType(Arc<RelationshipType>),
    ProgramStage(Arc<ProgramStage>),
}

// ==========================================
// QueryItemLocator - 查询项定位器
// ==========================================
pub struct QueryItemLocator<'a> {
    preheat: &'a TrackerPreheat,
}

impl<'a> QueryItemLocator<'a> {
    pub fn new(preheat: &'a TrackerPreheat) -> Self {
        Self { preheat }
    }

    /// 定位维度对应的查询项
    ///
    /// # 参数
    /// - dimension: 维度字符串（如 "stage.de[1]" / "de-legend" / "rt.pi"）
    /// - program: 查询所属项目
    /// - output_type: 输出类型（ENROLLMENT 下数据元必须指定阶段）
    ///
    /// # 返回
    /// - Ok(QueryItem)
    /// - Err: E7224 未找到 / E7225 缺阶段 / E7226 head 无法解析 / E7227 参数非法
    pub fn locate(
        &self,
        dimension: &str,
        program: &Program,
        output_type: Option<EventOutputType>,
    ) -> QueryResult<QueryItem> {
        let parsed = parse_dimension(dimension)?;
        let legend_set = parsed
            .legend_set
            .as_deref()
            .and_then(|id| self.preheat.get::<LegendSet>(id));
        let head = self.head_object(&parsed)?;

        let located = match self.data_element(&parsed, program, head.as_ref(), output_type)? {
            Some(item) => Some(item),
            None => self
                .tracked_entity_attribute(&parsed, program)
                .or_else(|| self.program_indicator(&parsed, program, head.as_ref())),
        };

        let mut item = located.ok_or_else(|| IllegalQueryError::ItemNotFound {
            item: dimension.to_string(),
        })?;

        if legend_set.is_some() && !matches!(item.item, QueryItemSource::ProgramIndicator(_)) {
            item.value_type = ValueType::Text;
        }
        item.legend_set = legend_set;

        debug!(dimension = %dimension, item = %item.item.uid(), "查询项定位完成");
        Ok(item)
    }

    /// head 依次按关系类型、项目阶段解析；复合维度 head 无法解析 → E7226
    fn head_object(&self, parsed: &ParsedDimension) -> QueryResult<Option<HeadObject>> {
        let head = match parsed.head.as_deref() {
            Some(head) => head,
            None => return Ok(None),
        };

        if let Some(rt) = self.preheat.get::<RelationshipType>(head) {
            return Ok(Some(HeadObject::RelationshipType(rt)));
        }
        if let Some(ps) = self.preheat.get::<ProgramStage>(head) {
            return Ok(Some(HeadObject::ProgramStage(ps)));
        }

        Err(IllegalQueryError::InvalidDimension {
            dimension: parsed.dimension.clone(),
        })
    }

    fn data_element(
        &self,
        parsed: &ParsedDimension,
        program: &Program,
        head: Option<&HeadObject>,
        output_type: Option<EventOutputType>,
    ) -> QueryResult<Option<QueryItem>> {
        let de = match self.preheat.get::<DataElement>(&parsed.item) {
            Some(de) if self.program_contains_data_element(program, &de.uid) => de,
            _ => return Ok(None),
        };

        let value_type = de.value_type;
        let mut item = QueryItem::new(QueryItemSource::DataElement(de), program, value_type);

        match head {
            Some(HeadObject::ProgramStage(ps)) => {
                item.program_stage = Some(Arc::clone(ps));
                item.repeatable_stage_params = parsed.repeatable_stage_params;
            }
            _ if output_type == Some(EventOutputType::Enrollment) => {
                return Err(IllegalQueryError::DataElementWithoutStage {
                    item: parsed.dimension.clone(),
                });
            }
            _ => {}
        }

        Ok(Some(item))
    }

    fn tracked_entity_attribute(
        &self,
        parsed: &ParsedDimension,
        program: &Program,
    ) -> Option<QueryItem> {
        let tea = self
            .preheat
            .get::<TrackedEntityAttribute>(&parsed.item)
            .filter(|tea| program.attributes.iter().any(|a| a == &tea.uid))?;

        let value_type = tea.value_type;
        Some(QueryItem::new(
            QueryItemSource::TrackedEntityAttribute(tea),
            program,
            value_type,
        ))
    }

    /// 其他项目的指标只有带关系类型时才允许
    fn program_indicator(
        &self,
        parsed: &ParsedDimension,
        program: &Program,
        head: Option<&HeadObject>,
    ) -> Option<QueryItem> {
        let pi = self.preheat.get::<ProgramIndicator>(&parsed.item)?;

        match head {
            Some(HeadObject::RelationshipType(rt)) => {
                let mut item = QueryItem::new(
                    QueryItemSource::ProgramIndicator(pi),
                    program,
                    ValueType::Number,
                );
                item.relationship_type = Some(Arc::clone(rt));
                Some(item)
            }
            _ if program.program_indicators.iter().any(|p| p == &pi.uid) => Some(QueryItem::new(
                QueryItemSource::ProgramIndicator(pi),
                program,
                ValueType::Number,
            )),
            _ => None,
        }
    }

    fn program_contains_data_element(&self, program: &Program, data_element_uid: &str) -> bool {
        program.program_stages.iter().any(|stage_id| {
            self.preheat
                .get_by_uid::<ProgramStage>(stage_id)
                .is_some_and(|ps| ps.data_elements.iter().any(|de| de == data_element_uid))
        })
    }
}
