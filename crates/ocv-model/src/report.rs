use serde::{Deserialize, Serialize};

use crate::finding::{Location, Rule, Severity};
use crate::schema::TableKind;

/// Findings that share a root cause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Stable id, embedded in the rendered report as the highlight key.
    pub id: String,
    pub rule: Rule,
    /// Maximum severity of the constituent findings.
    pub severity: Severity,
    pub message: String,
    /// Offending value of the first constituent finding.
    pub value: String,
    /// Every affected location, in first-occurrence order. Never empty.
    pub locations: Vec<Location>,
}

impl Issue {
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Whether any location falls in the given table.
    pub fn touches(&self, table: TableKind) -> bool {
        self.locations.iter().any(|loc| loc.table == table)
    }
}

/// Issue counts by severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub errors: usize,
    pub warnings: usize,
    /// Raw findings before grouping.
    pub findings: usize,
}

/// Result of one validation run. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub issues: Vec<Issue>,
    pub summary: Summary,
}

impl ValidationReport {
    pub fn new(issues: Vec<Issue>, findings: usize) -> Self {
        let errors = issues.iter().filter(|issue| issue.is_error()).count();
        let summary = Summary {
            errors,
            warnings: issues.len() - errors,
            findings,
        };
        Self { issues, summary }
    }

    pub fn error_count(&self) -> usize {
        self.summary.errors
    }

    pub fn warning_count(&self) -> usize {
        self.summary.warnings
    }

    pub fn has_errors(&self) -> bool {
        self.summary.errors > 0
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Issue> {
        self.issues.iter().find(|issue| issue.id == id)
    }

    /// Issues of one rule, in report order.
    pub fn by_rule(&self, rule: Rule) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(move |issue| issue.rule == rule)
    }
}
