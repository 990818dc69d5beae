//! Error types for report rendering.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors while rendering or writing a report.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write report {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to render HTML: {message}")]
    Render { message: String },

    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

impl ReportError {
    pub(crate) fn write(path: &Path, source: std::io::Error) -> Self {
        Self::Write {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn render(error: impl std::fmt::Display) -> Self {
        Self::Render {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
