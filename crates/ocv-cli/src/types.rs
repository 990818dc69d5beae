use std::path::PathBuf;
use std::time::Duration;

use ocv_model::{TableKind, ValidationReport};

/// One input file, with an optional explicit table kind.
#[derive(Debug, Clone)]
pub struct InputSpec {
    pub path: PathBuf,
    /// `None` detects the kind from the header.
    pub kind: Option<TableKind>,
}

impl InputSpec {
    pub fn detect(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind: None,
        }
    }

    pub fn with_kind(path: impl Into<PathBuf>, kind: TableKind) -> Self {
        Self {
            path: path.into(),
            kind: Some(kind),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Schema document replacing the embedded OpenCitations schema.
    pub schema: Option<PathBuf>,
    pub html_report: Option<PathBuf>,
    pub json_report: Option<PathBuf>,
    /// Skip every external identifier lookup.
    pub offline: bool,
    pub parallel: bool,
    /// Overrides the schema's resolver timeout.
    pub timeout: Option<Duration>,
}

#[derive(Debug)]
pub struct TableSummary {
    pub kind: TableKind,
    pub name: String,
    pub rows: usize,
    /// Error issues with at least one location in this table.
    pub errors: usize,
    pub warnings: usize,
}

#[derive(Debug)]
pub struct RunResult {
    pub report: ValidationReport,
    pub tables: Vec<TableSummary>,
    pub html_report: Option<PathBuf>,
    pub json_report: Option<PathBuf>,
    /// External lookups actually performed.
    pub lookups: usize,
}

impl RunResult {
    pub fn has_errors(&self) -> bool {
        self.report.has_errors()
    }

    /// Process exit status for this run: warnings alone do not fail it.
    pub fn exit_code(&self) -> i32 {
        if self.has_errors() { 1 } else { 0 }
    }
}
