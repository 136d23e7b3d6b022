// ==========================================
// Tracker 导入管道 - 解析层
// ==========================================
// 职责: 引用解析、维度表达式解析、查询项定位、AOC 推导
// ==========================================

pub mod aoc;
pub mod dimension;
pub mod error;
pub mod query_item;
pub mod reference;

pub use aoc::{
    AttributeOptionComboCache, AttributeOptionComboResolver, CategoryService,
    InMemoryCategoryService,
};
pub use dimension::{parse_dimension, remove_offset, repeatable_stage_params, ParsedDimension};
pub use error::{IllegalQueryError, QueryResult};
pub use query_item::{EventOutputType, QueryItem, QueryItemLocator, QueryItemSource};
pub use reference::{BatchIndex, Reference, ReferenceResolver};
