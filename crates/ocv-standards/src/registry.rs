#![deny(unsafe_code)]

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use ocv_model::{
    Cardinality, ColumnSpec, KeyRole, NameShape, NumeralStyle, Scheme, SemanticType, Severity,
    TableKind, Vocabulary,
};

use crate::config::{ColumnConfig, ResolverConfig, SchemaDocument, TableConfig, VocabularyConfig};
use crate::error::{ConfigError, Result};

/// Default schema for OpenCitations META-CSV and CITS-CSV tables.
const DEFAULT_SCHEMA: &str = include_str!("../data/opencitations.toml");

const DEFAULT_TIMEOUT_SECS: u64 = 10;

const DEFAULT_USER_AGENT: &str = concat!("ocv/", env!("CARGO_PKG_VERSION"));

/// Settings for the external identifier resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverSettings {
    pub timeout: Duration,
    pub user_agent: String,
    /// URL templates by scheme; `{value}` is replaced by the local identifier.
    pub endpoints: BTreeMap<Scheme, String>,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            endpoints: BTreeMap::new(),
        }
    }
}

/// Per-table column contracts. Read-only after construction.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    pub name: String,
    pub version: Option<String>,
    tables: BTreeMap<TableKind, Vec<ColumnSpec>>,
    vocabularies: BTreeMap<String, Arc<Vocabulary>>,
    resolver: ResolverSettings,
}

impl SchemaRegistry {
    /// The embedded OpenCitations schema.
    pub fn opencitations() -> Result<Self> {
        Self::from_toml_str(DEFAULT_SCHEMA, "embedded opencitations schema")
    }

    /// Load a schema document from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        Self::from_toml_str(&text, &path.display().to_string())
    }

    pub fn from_toml_str(text: &str, origin: &str) -> Result<Self> {
        let document: SchemaDocument = toml::from_str(text).map_err(|source| ConfigError::Toml {
            origin: origin.to_string(),
            source,
        })?;
        Self::from_document(document)
    }

    pub fn from_document(document: SchemaDocument) -> Result<Self> {
        let mut vocabularies = BTreeMap::new();
        for (name, config) in &document.vocabularies {
            vocabularies.insert(name.clone(), Arc::new(build_vocabulary(name, config)?));
        }

        let mut tables = BTreeMap::new();
        for (key, config) in &document.tables {
            let kind = TableKind::parse(key)
                .ok_or_else(|| ConfigError::UnknownTable { name: key.clone() })?;
            let columns = build_table(kind, config, &vocabularies)?;
            tables.insert(kind, columns);
        }

        let resolver = match &document.resolver {
            Some(config) => build_resolver(config)?,
            None => ResolverSettings::default(),
        };

        tracing::debug!(
            schema = %document.schema.name,
            tables = tables.len(),
            vocabularies = vocabularies.len(),
            "schema registry loaded"
        );

        Ok(Self {
            name: document.schema.name,
            version: document.schema.version,
            tables,
            vocabularies,
            resolver,
        })
    }

    /// Ordered column contracts for a table kind.
    pub fn columns_for(&self, kind: TableKind) -> Result<&[ColumnSpec]> {
        self.tables
            .get(&kind)
            .map(Vec::as_slice)
            .ok_or_else(|| ConfigError::MissingTable {
                kind: kind.code().to_string(),
            })
    }

    /// Fail fast when the workload needs a table kind the schema lacks.
    pub fn require(&self, kinds: &[TableKind]) -> Result<()> {
        for kind in kinds {
            self.columns_for(*kind)?;
        }
        Ok(())
    }

    pub fn table_kinds(&self) -> impl Iterator<Item = TableKind> + '_ {
        self.tables.keys().copied()
    }

    pub fn vocabulary(&self, name: &str) -> Option<&Arc<Vocabulary>> {
        self.vocabularies.get(name)
    }

    pub fn resolver(&self) -> &ResolverSettings {
        &self.resolver
    }

    /// The column holding a given role, if the table declares one.
    pub fn column_with_role(&self, kind: TableKind, role: KeyRole) -> Option<&ColumnSpec> {
        self.tables
            .get(&kind)?
            .iter()
            .find(|column| column.role == Some(role))
    }
}

fn build_vocabulary(name: &str, config: &VocabularyConfig) -> Result<Vocabulary> {
    let terms: BTreeSet<String> = config
        .terms
        .iter()
        .map(|term| term.trim().to_string())
        .filter(|term| !term.is_empty())
        .collect();
    if terms.is_empty() {
        return Err(ConfigError::EmptyVocabulary {
            vocabulary: name.to_string(),
        });
    }
    let severity = match &config.severity {
        Some(value) => Severity::parse(value).ok_or_else(|| ConfigError::InvalidSeverity {
            vocabulary: name.to_string(),
            value: value.clone(),
        })?,
        None => Severity::Error,
    };
    Ok(Vocabulary {
        name: name.to_string(),
        terms,
        severity,
    })
}

fn build_table(
    kind: TableKind,
    config: &TableConfig,
    vocabularies: &BTreeMap<String, Arc<Vocabulary>>,
) -> Result<Vec<ColumnSpec>> {
    if config.columns.is_empty() {
        return Err(ConfigError::EmptyTable {
            kind: kind.code().to_string(),
        });
    }

    let mut seen = BTreeSet::new();
    let mut columns = Vec::with_capacity(config.columns.len());
    for column in &config.columns {
        if !seen.insert(column.name.as_str()) {
            return Err(ConfigError::DuplicateColumn {
                kind: kind.code().to_string(),
                column: column.name.clone(),
            });
        }
        columns.push(build_column(column, vocabularies)?);
    }

    let primary_keys = columns
        .iter()
        .filter(|column| column.role == Some(KeyRole::Primary))
        .count();
    if primary_keys > 1 {
        return Err(ConfigError::MultiplePrimaryKeys {
            kind: kind.code().to_string(),
        });
    }

    Ok(columns)
}

fn build_column(
    config: &ColumnConfig,
    vocabularies: &BTreeMap<String, Arc<Vocabulary>>,
) -> Result<ColumnSpec> {
    let name = config.name.as_str();
    let semantic = match config.type_name.trim() {
        "text" => SemanticType::Text,
        "identifier" => SemanticType::Identifier {
            schemes: parse_schemes(config)?,
        },
        "agent" => SemanticType::Agent {
            schemes: parse_schemes(config)?,
            shape: parse_shape(config)?,
        },
        "venue" => SemanticType::Venue {
            schemes: parse_schemes(config)?,
        },
        "date" => SemanticType::Date,
        "numeral" => SemanticType::Numeral {
            style: parse_numerals(config)?,
        },
        "page_range" => SemanticType::PageRange {
            style: parse_numerals(config)?,
        },
        "vocabulary" => {
            let vocabulary_name = config.vocabulary.as_deref().unwrap_or_default();
            let vocabulary = vocabularies.get(vocabulary_name).ok_or_else(|| {
                ConfigError::UnknownVocabulary {
                    column: name.to_string(),
                    vocabulary: vocabulary_name.to_string(),
                }
            })?;
            SemanticType::Vocabulary {
                vocabulary: Arc::clone(vocabulary),
            }
        }
        other => {
            return Err(ConfigError::UnknownSemanticType {
                column: name.to_string(),
                type_name: other.to_string(),
            });
        }
    };

    let cardinality = match config.cardinality.as_deref().map(str::trim) {
        None | Some("single") => Cardinality::Single,
        Some("list") => match &config.delimiter {
            Some(delimiter) if !delimiter.is_empty() => Cardinality::List {
                delimiter: delimiter.clone(),
            },
            _ => {
                return Err(ConfigError::MissingDelimiter {
                    column: name.to_string(),
                });
            }
        },
        Some(other) => return Err(ConfigError::invalid(name, "cardinality", other)),
    };

    let role = match config.role.as_deref().map(str::trim) {
        None => None,
        Some("primary") => Some(KeyRole::Primary),
        Some("citing") => Some(KeyRole::Citing),
        Some("cited") => Some(KeyRole::Cited),
        Some(other) => return Err(ConfigError::invalid(name, "role", other)),
    };

    if config.resolve && semantic.schemes().is_empty() {
        return Err(ConfigError::invalid(name, "resolve", "true"));
    }

    Ok(ColumnSpec {
        name: name.to_string(),
        semantic,
        cardinality,
        required: config.required,
        role,
        resolve: config.resolve,
    })
}

fn parse_schemes(config: &ColumnConfig) -> Result<Vec<Scheme>> {
    if config.schemes.is_empty() {
        return Err(ConfigError::MissingSchemes {
            column: config.name.clone(),
        });
    }
    config
        .schemes
        .iter()
        .map(|raw| {
            Scheme::parse(raw).ok_or_else(|| ConfigError::UnknownScheme {
                scheme: raw.clone(),
                context: format!("column '{}'", config.name),
            })
        })
        .collect()
}

fn parse_shape(config: &ColumnConfig) -> Result<NameShape> {
    match config.shape.as_deref().map(str::trim) {
        None | Some("free") => Ok(NameShape::Free),
        Some("person") => Ok(NameShape::Person),
        Some(other) => Err(ConfigError::invalid(&config.name, "shape", other)),
    }
}

fn parse_numerals(config: &ColumnConfig) -> Result<NumeralStyle> {
    if config.numerals.is_empty() {
        return Ok(NumeralStyle::default());
    }
    let mut style = NumeralStyle {
        arabic: false,
        roman: false,
    };
    for raw in &config.numerals {
        match raw.trim() {
            "arabic" => style.arabic = true,
            "roman" => style.roman = true,
            other => return Err(ConfigError::invalid(&config.name, "numeral system", other)),
        }
    }
    Ok(style)
}

fn build_resolver(config: &ResolverConfig) -> Result<ResolverSettings> {
    let mut endpoints = BTreeMap::new();
    for (raw_scheme, template) in &config.endpoints {
        let scheme = Scheme::parse(raw_scheme).ok_or_else(|| ConfigError::UnknownScheme {
            scheme: raw_scheme.clone(),
            context: "resolver endpoints".to_string(),
        })?;
        if !template.starts_with("http://") && !template.starts_with("https://") {
            return Err(ConfigError::InvalidEndpoint {
                scheme: raw_scheme.clone(),
                message: "endpoint must be an http(s) URL".to_string(),
            });
        }
        if !template.contains("{value}") {
            return Err(ConfigError::InvalidEndpoint {
                scheme: raw_scheme.clone(),
                message: "endpoint must contain a {value} placeholder".to_string(),
            });
        }
        endpoints.insert(scheme, template.clone());
    }
    Ok(ResolverSettings {
        timeout: Duration::from_secs(config.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
        user_agent: config
            .user_agent
            .clone()
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
        endpoints,
    })
}
