//! Per-row validation.
//!
//! A row is checked against every column contract of its table kind in
//! schema order. Rows are independent of each other, so this phase may run in
//! parallel; the keys collected here feed the cross-row phase afterwards.

use std::collections::{BTreeSet, HashSet};

use ocv_model::{
    ColumnSpec, Finding, KeyRole, Location, Row, Rule, Table, TableKind, canonical_value,
};
use rayon::prelude::*;

use crate::checks::identifier::{check_identifier, parse_identifier};
use crate::checks::{check_item, identifiers_in};
use crate::resolver::{Resolution, Resolver};

/// Header-level facts shared by every row of a table.
#[derive(Debug)]
pub struct TableLayout<'a> {
    pub kind: TableKind,
    pub columns: &'a [ColumnSpec],
    missing: HashSet<&'a str>,
}

impl<'a> TableLayout<'a> {
    pub fn new(table: &Table, columns: &'a [ColumnSpec]) -> Self {
        let missing = columns
            .iter()
            .filter(|spec| !table.headers.contains(&spec.name))
            .map(|spec| spec.name.as_str())
            .collect();
        Self {
            kind: table.kind,
            columns,
            missing,
        }
    }

    /// Whether the header lacks a registered column.
    pub fn is_missing(&self, column: &str) -> bool {
        self.missing.contains(column)
    }

    /// Whether a column name is registered for this table kind.
    pub fn is_registered(&self, column: &str) -> bool {
        self.columns.iter().any(|spec| spec.name == column)
    }
}

/// Per-cell summary of a row result; one per column contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellOutcome {
    pub column: String,
    /// The header carries the column.
    pub present: bool,
    /// Atomic values the cell split into.
    pub items: usize,
    /// Findings produced for this cell.
    pub findings: usize,
}

/// An identifier carried by a key column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyItem {
    /// Canonical form used for matching across rows.
    pub key: String,
    /// As written.
    pub raw: String,
    pub item: Option<usize>,
}

/// Identifiers of a row grouped by key role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowKeys {
    pub primary: Vec<KeyItem>,
    pub citing: Vec<KeyItem>,
    pub cited: Vec<KeyItem>,
    /// Canonical identifiers the external resolver confirmed.
    pub known: BTreeSet<String>,
}

impl RowKeys {
    pub fn role(&self, role: KeyRole) -> &[KeyItem] {
        match role {
            KeyRole::Primary => &self.primary,
            KeyRole::Citing => &self.citing,
            KeyRole::Cited => &self.cited,
        }
    }

    fn role_mut(&mut self, role: KeyRole) -> &mut Vec<KeyItem> {
        match role {
            KeyRole::Primary => &mut self.primary,
            KeyRole::Citing => &mut self.citing,
            KeyRole::Cited => &mut self.cited,
        }
    }
}

/// Result of validating one row.
#[derive(Debug, Clone)]
pub struct RowOutcome {
    pub row: usize,
    pub cells: Vec<CellOutcome>,
    pub findings: Vec<Finding>,
    pub keys: RowKeys,
}

/// Result of the row phase for a whole table.
#[derive(Debug, Clone)]
pub struct TableOutcome {
    pub kind: TableKind,
    pub rows: Vec<RowOutcome>,
}

/// Validate every row of a table.
pub fn validate_table(
    table: &Table,
    columns: &[ColumnSpec],
    resolver: &dyn Resolver,
    parallel: bool,
) -> TableOutcome {
    let _span = tracing::info_span!("validate_table", table = %table.kind).entered();
    let layout = TableLayout::new(table, columns);
    if !layout.missing.is_empty() {
        tracing::warn!(
            table = %table.kind,
            missing = ?layout.missing,
            "header lacks registered columns"
        );
    }

    let rows = if parallel {
        table
            .rows
            .par_iter()
            .map(|row| validate_row(row, &layout, resolver))
            .collect()
    } else {
        table
            .rows
            .iter()
            .map(|row| validate_row(row, &layout, resolver))
            .collect()
    };

    TableOutcome {
        kind: table.kind,
        rows,
    }
}

/// Validate one row against the table's column contracts.
pub fn validate_row(row: &Row, layout: &TableLayout<'_>, resolver: &dyn Resolver) -> RowOutcome {
    let mut findings = Vec::new();
    let mut cells = Vec::with_capacity(layout.columns.len());
    let mut keys = RowKeys::default();

    for spec in layout.columns {
        let before = findings.len();
        let cell = Location::cell(layout.kind, row.index, &spec.name);

        if layout.is_missing(&spec.name) {
            findings.push(Finding::new(
                Rule::MissingColumn,
                cell,
                "",
                format!("column '{}' is missing from the header", spec.name),
            ));
            cells.push(CellOutcome {
                column: spec.name.clone(),
                present: false,
                items: 0,
                findings: findings.len() - before,
            });
            continue;
        }

        let raw = row.get(&spec.name).unwrap_or("");
        let items = spec.cardinality.split(raw);
        if items.is_empty() && spec.required {
            findings.push(Finding::new(
                Rule::MissingRequiredValue,
                cell.clone(),
                raw,
                format!("required column '{}' is empty", spec.name),
            ));
        }

        for (idx, item) in items.iter().enumerate() {
            let location = cell.clone().with_item(spec.cardinality.is_list().then_some(idx));
            if item.trim().is_empty() {
                findings.push(Finding::new(
                    Rule::EmptyListItem,
                    location,
                    "",
                    format!("empty item in '{}' list", spec.name),
                ));
                continue;
            }

            findings.extend(
                check_item(item, spec)
                    .into_iter()
                    .map(|violation| violation.into_finding(location.clone())),
            );

            let ids = identifiers_in(item, spec);
            if let Some(role) = spec.role {
                keys.role_mut(role)
                    .extend(ids.iter().map(|id| KeyItem {
                        key: canonical_value(id),
                        raw: (*id).to_string(),
                        item: location.item,
                    }));
            }
            if spec.resolve {
                for id in ids {
                    resolve_identifier(id, spec, &location, resolver, &mut findings, &mut keys);
                }
            }
        }

        cells.push(CellOutcome {
            column: spec.name.clone(),
            present: true,
            items: items.len(),
            findings: findings.len() - before,
        });
    }

    let mut seen: HashSet<&str> = HashSet::new();
    for (name, value) in &row.fields {
        let message = if !layout.is_registered(name) {
            format!(
                "column '{name}' is not part of the {} schema",
                layout.kind.label().to_lowercase()
            )
        } else if !seen.insert(name.as_str()) {
            format!("column '{name}' is repeated in the header; only the first is validated")
        } else {
            continue;
        };
        findings.push(Finding::new(
            Rule::UnexpectedColumn,
            Location::cell(layout.kind, row.index, name),
            value.as_str(),
            message,
        ));
    }

    RowOutcome {
        row: row.index,
        cells,
        findings,
        keys,
    }
}

/// Look up one well-formed identifier externally. Malformed identifiers and
/// schemes without an endpoint are skipped.
fn resolve_identifier(
    id: &str,
    spec: &ColumnSpec,
    location: &Location,
    resolver: &dyn Resolver,
    findings: &mut Vec<Finding>,
    keys: &mut RowKeys,
) {
    let Some((scheme, local)) = parse_identifier(id) else {
        return;
    };
    if !resolver.supports(scheme) || !check_identifier(id, spec.semantic.schemes()).is_empty() {
        return;
    }

    match resolver.resolve(scheme, local) {
        Resolution::Known => {
            keys.known.insert(canonical_value(id));
        }
        Resolution::Unknown => findings.push(Finding::new(
            Rule::UnresolvedReference,
            location.clone(),
            id,
            format!("'{id}' is not known to the {scheme} registry"),
        )),
        Resolution::LookupFailed => findings.push(Finding::new(
            Rule::ExternalCheckUnavailable,
            location.clone(),
            id,
            format!("'{id}' could not be checked against the {scheme} registry"),
        )),
    }
}
