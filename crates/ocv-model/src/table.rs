use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::schema::TableKind;

/// One data row: an ordered mapping from column name to raw text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    /// 0-based position in the source table (header excluded).
    pub index: usize,
    pub fields: Vec<(String, String)>,
}

impl Row {
    pub fn new(index: usize, fields: Vec<(String, String)>) -> Self {
        Self { index, fields }
    }

    /// Raw value of a column, if the row carries it.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }
}

/// An input table in source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub kind: TableKind,
    pub source: Option<PathBuf>,
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(kind: TableKind, headers: Vec<String>) -> Self {
        Self {
            kind,
            source: None,
            headers,
            rows: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: impl Into<PathBuf>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Append a record, pairing values with headers by position.
    ///
    /// Values beyond the header get positional names (`column_N`), so ragged
    /// input surfaces as unexpected columns instead of being dropped.
    pub fn push_record<I, S>(&mut self, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields = values
            .into_iter()
            .enumerate()
            .map(|(idx, value)| {
                let name = self
                    .headers
                    .get(idx)
                    .cloned()
                    .unwrap_or_else(|| format!("column_{}", idx + 1));
                (name, value.into())
            })
            .collect();
        let index = self.rows.len();
        self.rows.push(Row::new(index, fields));
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Display name: the source file name when known.
    pub fn display_name(&self) -> String {
        self.source
            .as_ref()
            .and_then(|path| path.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.kind.label().to_string())
    }
}
