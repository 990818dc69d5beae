//! CSV file reading.
//!
//! Values are kept verbatim (no trimming): whitespace is part of what the
//! validators judge. Only the UTF-8 BOM on the first header is stripped.

use std::io::Read;
use std::path::Path;

use ocv_model::{Table, TableKind};

use crate::error::{IngestError, Result};

/// Maximum file size for CSV loading (500 MB default).
pub const MAX_CSV_FILE_SIZE: u64 = 500 * 1024 * 1024;

/// Headers and raw records of a CSV file.
#[derive(Debug, Clone)]
pub struct CsvContents {
    pub headers: Vec<String>,
    pub records: Vec<Vec<String>>,
}

impl CsvContents {
    /// Build a table of the given kind from these contents.
    pub fn into_table(self, kind: TableKind, path: &Path) -> Table {
        let mut table = Table::new(kind, self.headers).with_source(path);
        for record in self.records {
            table.push_record(record);
        }
        table
    }
}

/// Check file size against a custom limit.
pub fn check_file_size_with_limit(path: &Path, max_size: u64) -> Result<()> {
    let metadata = std::fs::metadata(path).map_err(|e| IngestError::read(path, e))?;
    if metadata.len() > max_size {
        return Err(IngestError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size,
        });
    }
    Ok(())
}

/// Read a CSV file into headers and raw records.
pub fn read_csv(path: &Path) -> Result<CsvContents> {
    check_file_size_with_limit(path, MAX_CSV_FILE_SIZE)?;
    let mut bytes = Vec::new();
    std::fs::File::open(path)
        .and_then(|mut file| file.read_to_end(&mut bytes))
        .map_err(|e| IngestError::read(path, e))?;
    read_csv_bytes(&bytes, path)
}

/// Parse CSV bytes; `path` is used for error messages only.
pub fn read_csv_bytes(bytes: &[u8], path: &Path) -> Result<CsvContents> {
    if bytes.starts_with(&[0xFF, 0xFE]) {
        return Err(IngestError::UnsupportedEncoding {
            path: path.to_path_buf(),
            encoding: "UTF-16 LE",
        });
    }
    if bytes.starts_with(&[0xFE, 0xFF]) {
        return Err(IngestError::UnsupportedEncoding {
            path: path.to_path_buf(),
            encoding: "UTF-16 BE",
        });
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .iter()
        .map(|h| h.trim_matches('\u{feff}').trim().to_string())
        .collect();

    if headers.is_empty() {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    }
    if headers.iter().any(String::is_empty) {
        return Err(IngestError::EmptyColumnName {
            path: path.to_path_buf(),
        });
    }

    let mut records = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        records.push(record.iter().map(str::to_string).collect());
    }

    tracing::debug!(
        path = %path.display(),
        columns = headers.len(),
        rows = records.len(),
        "csv loaded"
    );

    Ok(CsvContents { headers, records })
}
