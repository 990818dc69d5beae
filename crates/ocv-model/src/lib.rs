//! Data model for validating OpenCitations-style CSV tables.
//!
//! The types here are shared by every other crate in the workspace:
//!
//! - [`Table`] / [`Row`]: raw input as loaded from CSV, in source order
//! - [`ColumnSpec`] / [`SemanticType`]: the per-column contract held by the schema registry
//! - [`Finding`]: one raw violation at one cell (or one item within a cell)
//! - [`Issue`] / [`ValidationReport`]: findings grouped by root cause, ready for rendering

pub mod finding;
pub mod report;
pub mod schema;
pub mod table;

pub use finding::{Finding, Location, Rule, Severity, canonical_value};
pub use report::{Issue, Summary, ValidationReport};
pub use schema::{
    Cardinality, ColumnSpec, KeyRole, NameShape, NumeralStyle, Scheme, SemanticType, TableKind,
    Vocabulary,
};
pub use table::{Row, Table};
