//! Raw findings produced by a single check invocation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::schema::TableKind;

/// Finding severity. Ordered so that `max` picks the most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Should review; does not fail the run.
    Warning,
    /// Must fix; fails the run.
    Error,
}

impl Severity {
    /// Parse severity from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "error" => Some(Self::Error),
            "warning" | "warn" => Some(Self::Warning),
            _ => None,
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Error => "Error",
            Self::Warning => "Warning",
        }
    }
}

/// Every rule a check can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rule {
    // Structure
    MissingColumn,
    UnexpectedColumn,
    MissingRequiredValue,

    // Field syntax
    MalformedIdentifier,
    InvalidChecksum,
    InvalidDate,
    InconsistentDatePrecision,
    InvalidNumeral,
    InvalidPageRange,
    EmptyListItem,
    MalformedName,
    UnknownVocabularyTerm,

    // External knowledge base
    UnresolvedReference,
    ExternalCheckUnavailable,

    // Cross-row
    DuplicateIdentifier,
    DanglingReference,
    SelfCitation,
    DuplicateCitation,
    OrphanEntity,
}

impl Rule {
    /// Stable rule name as it appears in reports.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingColumn => "MissingColumn",
            Self::UnexpectedColumn => "UnexpectedColumn",
            Self::MissingRequiredValue => "MissingRequiredValue",
            Self::MalformedIdentifier => "MalformedIdentifier",
            Self::InvalidChecksum => "InvalidChecksum",
            Self::InvalidDate => "InvalidDate",
            Self::InconsistentDatePrecision => "InconsistentDatePrecision",
            Self::InvalidNumeral => "InvalidNumeral",
            Self::InvalidPageRange => "InvalidPageRange",
            Self::EmptyListItem => "EmptyListItem",
            Self::MalformedName => "MalformedName",
            Self::UnknownVocabularyTerm => "UnknownVocabularyTerm",
            Self::UnresolvedReference => "UnresolvedReference",
            Self::ExternalCheckUnavailable => "ExternalCheckUnavailable",
            Self::DuplicateIdentifier => "DuplicateIdentifier",
            Self::DanglingReference => "DanglingReference",
            Self::SelfCitation => "SelfCitation",
            Self::DuplicateCitation => "DuplicateCitation",
            Self::OrphanEntity => "OrphanEntity",
        }
    }

    /// Kebab-case form used as the prefix of issue ids.
    pub fn slug(&self) -> String {
        let mut slug = String::new();
        for (idx, ch) in self.code().chars().enumerate() {
            if ch.is_ascii_uppercase() {
                if idx > 0 {
                    slug.push('-');
                }
                slug.push(ch.to_ascii_lowercase());
            } else {
                slug.push(ch);
            }
        }
        slug
    }

    pub fn default_severity(&self) -> Severity {
        match self {
            Self::UnexpectedColumn
            | Self::InconsistentDatePrecision
            | Self::ExternalCheckUnavailable
            | Self::SelfCitation
            | Self::DuplicateCitation
            | Self::OrphanEntity => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Rules whose findings group by column rather than by offending value.
    pub fn groups_by_column(&self) -> bool {
        matches!(
            self,
            Self::MissingColumn
                | Self::UnexpectedColumn
                | Self::MissingRequiredValue
                | Self::EmptyListItem
        )
    }

    /// Rules produced by the cross-row phase.
    pub fn is_relational(&self) -> bool {
        matches!(
            self,
            Self::DuplicateIdentifier
                | Self::DanglingReference
                | Self::SelfCitation
                | Self::DuplicateCitation
                | Self::OrphanEntity
        )
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A cell, or one item within a list cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub table: TableKind,
    /// 0-based data row index (header excluded).
    pub row: usize,
    pub column: String,
    /// Item index for list cells; `None` addresses the whole cell.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<usize>,
}

impl Location {
    pub fn cell(table: TableKind, row: usize, column: impl Into<String>) -> Self {
        Self {
            table,
            row,
            column: column.into(),
            item: None,
        }
    }

    #[must_use]
    pub fn with_item(mut self, item: Option<usize>) -> Self {
        self.item = item;
        self
    }
}

/// One raw violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub rule: Rule,
    pub severity: Severity,
    pub location: Location,
    /// Offending value as written in the cell.
    pub value: String,
    /// Grouping signature; findings with equal (rule, signature) form one issue.
    pub signature: String,
    pub message: String,
}

impl Finding {
    /// Create a finding with the rule's default severity and signature.
    pub fn new(
        rule: Rule,
        location: Location,
        value: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        let value = value.into();
        let signature = if rule.groups_by_column() {
            format!("{}|{}", location.table.code(), location.column)
        } else {
            canonical_value(&value)
        };
        Self {
            rule,
            severity: rule.default_severity(),
            location,
            value,
            signature,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    #[must_use]
    pub fn with_signature(mut self, signature: impl Into<String>) -> Self {
        self.signature = signature.into();
        self
    }
}

/// Canonical form of an offending value: trimmed, whitespace collapsed, lowercase.
pub fn canonical_value(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
