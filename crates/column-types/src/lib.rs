//! Column types for struct-style data tables.
//!
//! A [`ColumnType`](column_type::ColumnType) decides how a field is shown and
//! how it takes part in a query: which expression is selected, how it is
//! filtered, how it is sorted. Besides the plain value types this crate
//! provides [`Lookup`](types::lookup::Lookup), a reference into another
//! schema, and [`Join`](types::join::Join), which follows a lookup that is
//! already joined into the query and hands everything to the referenced
//! column's own type.

pub mod alias;
pub mod base;
pub mod column_type;
pub mod config;
pub mod error;
pub mod filter;
pub mod plan;
pub mod render;
pub mod schema;
pub mod types;
