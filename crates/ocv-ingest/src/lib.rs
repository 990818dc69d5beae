//! Input loading for the validator.
//!
//! - Reads CSV files verbatim into [`Table`]s (UTF-8 only)
//! - Detects whether a file is an entity or a citation table from its header

mod detect;
mod error;
mod reader;

use std::path::Path;

use ocv_model::{Table, TableKind};
use ocv_standards::SchemaRegistry;

pub use detect::detect_kind;
pub use error::{IngestError, Result};
pub use reader::{
    CsvContents, MAX_CSV_FILE_SIZE, check_file_size_with_limit, read_csv, read_csv_bytes,
};

/// Load a table, detecting its kind from the header unless `kind` is given.
pub fn load_table(
    path: &Path,
    kind: Option<TableKind>,
    registry: &SchemaRegistry,
) -> Result<Table> {
    let contents = read_csv(path)?;
    let kind = match kind {
        Some(kind) => kind,
        None => detect_kind(&contents.headers, registry).ok_or_else(|| {
            IngestError::UnknownTableKind {
                path: path.to_path_buf(),
                headers: contents.headers.join(","),
            }
        })?,
    };
    tracing::info!(
        path = %path.display(),
        kind = %kind,
        rows = contents.records.len(),
        "table loaded"
    );
    Ok(contents.into_table(kind, path))
}
