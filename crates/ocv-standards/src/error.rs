#![deny(unsafe_code)]

use std::path::PathBuf;

/// Fatal configuration problems. Raised before any row is processed.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read schema file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse schema {origin}: {source}")]
    Toml {
        origin: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("no schema registered for table kind '{kind}'")]
    MissingTable { kind: String },

    #[error("unknown table kind '{name}' in schema")]
    UnknownTable { name: String },

    #[error("table '{kind}' declares no columns")]
    EmptyTable { kind: String },

    #[error("column '{column}' declared twice in table '{kind}'")]
    DuplicateColumn { kind: String, column: String },

    #[error("column '{column}' references undefined semantic type '{type_name}'")]
    UnknownSemanticType { column: String, type_name: String },

    #[error("unknown identifier scheme '{scheme}' ({context})")]
    UnknownScheme { scheme: String, context: String },

    #[error("column '{column}' requires at least one identifier scheme")]
    MissingSchemes { column: String },

    #[error("column '{column}' references undefined vocabulary '{vocabulary}'")]
    UnknownVocabulary { column: String, vocabulary: String },

    #[error("vocabulary '{vocabulary}' has no terms")]
    EmptyVocabulary { vocabulary: String },

    #[error("invalid severity '{value}' for vocabulary '{vocabulary}'")]
    InvalidSeverity { vocabulary: String, value: String },

    #[error("list column '{column}' has no delimiter")]
    MissingDelimiter { column: String },

    #[error("invalid {field} '{value}' for column '{column}'")]
    InvalidValue {
        column: String,
        field: String,
        value: String,
    },

    #[error("table '{kind}' declares more than one primary key column")]
    MultiplePrimaryKeys { kind: String },

    #[error("invalid resolver endpoint for {scheme}: {message}")]
    InvalidEndpoint { scheme: String, message: String },
}

impl ConfigError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid(column: &str, field: &str, value: &str) -> Self {
        Self::InvalidValue {
            column: column.to_string(),
            field: field.to_string(),
            value: value.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;
