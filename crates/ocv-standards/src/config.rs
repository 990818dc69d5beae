#![deny(unsafe_code)]

//! Raw schema document as written in TOML.
//!
//! Everything that names a closed set (semantic types, schemes, severities,
//! roles) is kept as a string here and checked when the registry is built, so
//! a typo produces a [`ConfigError`](crate::ConfigError) naming the column.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaDocument {
    pub schema: SchemaHeader,
    #[serde(default)]
    pub vocabularies: BTreeMap<String, VocabularyConfig>,
    #[serde(default)]
    pub tables: BTreeMap<String, TableConfig>,
    #[serde(default)]
    pub resolver: Option<ResolverConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaHeader {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabularyConfig {
    #[serde(default)]
    pub severity: Option<String>,
    pub terms: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableConfig {
    pub columns: Vec<ColumnConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnConfig {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub cardinality: Option<String>,
    #[serde(default)]
    pub delimiter: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub resolve: bool,
    #[serde(default)]
    pub schemes: Vec<String>,
    #[serde(default)]
    pub vocabulary: Option<String>,
    #[serde(default)]
    pub shape: Option<String>,
    #[serde(default)]
    pub numerals: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub endpoints: BTreeMap<String, String>,
}
