//! Error types for the validation engine.

use ocv_model::TableKind;
use ocv_standards::ConfigError;
use thiserror::Error;

/// Fatal errors that stop a validation run before any report exists.
#[derive(Debug, Error)]
pub enum ValidateError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("more than one {kind} table supplied")]
    DuplicateTable { kind: TableKind },

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// Errors building an external resolver.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, ValidateError>;
