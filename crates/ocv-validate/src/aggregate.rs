//! Grouping of raw findings into issues.
//!
//! Findings that share a rule and a grouping signature describe the same
//! underlying defect and become one issue listing every location. Issue ids
//! are derived from the rule and signature only, so they are stable across
//! runs over the same input.

use std::collections::{HashMap, HashSet};

use ocv_model::{Finding, Issue, Location, Rule, Table, TableKind, ValidationReport};
use ocv_standards::SchemaRegistry;
use sha2::{Digest, Sha256};

/// Length of the hash suffix in issue ids.
const ID_HASH_LEN: usize = 12;

/// Stable id of the issue a (rule, signature) pair belongs to.
pub fn issue_id(rule: Rule, signature: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(rule.code().as_bytes());
    hasher.update([0x1f]);
    hasher.update(signature.as_bytes());
    let digest = hex::encode(hasher.finalize());
    format!("{}-{}", rule.slug(), &digest[..ID_HASH_LEN])
}

/// Position of a column within its table, used to order findings.
#[derive(Debug, Clone, Default)]
pub struct FindingOrder {
    columns: HashMap<TableKind, HashMap<String, usize>>,
}

impl FindingOrder {
    /// Registered columns first in schema order, then unregistered header
    /// columns in header order.
    pub fn new(tables: &[Table], registry: &SchemaRegistry) -> Self {
        let mut columns = HashMap::new();
        for table in tables {
            let mut positions: HashMap<String, usize> = HashMap::new();
            if let Ok(specs) = registry.columns_for(table.kind) {
                for spec in specs {
                    let next = positions.len();
                    positions.entry(spec.name.clone()).or_insert(next);
                }
            }
            for header in &table.headers {
                let next = positions.len();
                positions.entry(header.clone()).or_insert(next);
            }
            columns.insert(table.kind, positions);
        }
        Self { columns }
    }

    fn column(&self, location: &Location) -> usize {
        self.columns
            .get(&location.table)
            .and_then(|positions| positions.get(&location.column))
            .copied()
            .unwrap_or(usize::MAX)
    }

    fn key(&self, location: &Location) -> (TableKind, usize, usize, usize) {
        (
            location.table,
            location.row,
            self.column(location),
            location.item.map_or(0, |item| item + 1),
        )
    }
}

/// Group findings into a report.
///
/// Findings are ordered by table, row, column and item (production order
/// breaks ties), and issues appear in the order of their first finding.
pub fn aggregate(mut findings: Vec<Finding>, order: &FindingOrder) -> ValidationReport {
    findings.sort_by_key(|finding| order.key(&finding.location));
    let total = findings.len();

    let mut issues: Vec<Issue> = Vec::new();
    let mut by_key: HashMap<(Rule, String), usize> = HashMap::new();
    let mut seen: Vec<HashSet<Location>> = Vec::new();

    for finding in findings {
        let key = (finding.rule, finding.signature);
        match by_key.get(&key) {
            Some(&idx) => {
                let issue = &mut issues[idx];
                issue.severity = issue.severity.max(finding.severity);
                if seen[idx].insert(finding.location.clone()) {
                    issue.locations.push(finding.location);
                }
            }
            None => {
                let (rule, signature) = key;
                let idx = issues.len();
                issues.push(Issue {
                    id: issue_id(rule, &signature),
                    rule,
                    severity: finding.severity,
                    message: finding.message,
                    value: finding.value,
                    locations: vec![finding.location.clone()],
                });
                seen.push(HashSet::from([finding.location]));
                by_key.insert((rule, signature), idx);
            }
        }
    }

    tracing::debug!(findings = total, issues = issues.len(), "findings aggregated");
    ValidationReport::new(issues, total)
}
