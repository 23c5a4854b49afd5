// src/query_builders/mod.rs
//! Building blocks for JSON-API driven SELECT statements

pub mod fields;
pub mod pagination;
pub mod params;
pub mod sort;
pub mod utils;
pub mod value;

// Re-export of the main types
pub use fields::{select_expressions, FieldExpressions, NestedExpressions};
pub use pagination::PageSpec;
pub use params::QueryParams;
pub use sort::{order_by, SortOrder, SortSpec};
pub use value::{bind_args, QueryArg};
