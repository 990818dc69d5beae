#![deny(unsafe_code)]

//! Validation engine for bibliographic entity and citation tables.
//!
//! Validation runs in two phases with a barrier between them:
//!
//! 1. **Row phase**: every row of every table is checked against its column
//!    contracts. Rows are independent and may be processed in parallel.
//! 2. **Relational phase**: duplicate, dangling, self and orphan checks over
//!    the identifiers collected in phase 1.
//!
//! All findings are then grouped into a [`ValidationReport`].

pub mod aggregate;
pub mod checks;
pub mod cross_table;
pub mod error;
pub mod resolver;
pub mod row;

use ocv_model::{Table, TableKind, ValidationReport};
use ocv_standards::SchemaRegistry;
use tracing::{debug, info};

pub use aggregate::{FindingOrder, aggregate, issue_id};
pub use error::{ResolveError, Result, ValidateError};
pub use resolver::{CachedResolver, HttpResolver, OfflineResolver, Resolution, Resolver};
pub use row::{CellOutcome, RowOutcome, TableOutcome, validate_row, validate_table};

use cross_table::{KeyColumns, KeyedTable, check_relations};

/// Runtime switches for a validation run.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationOptions {
    /// Validate rows on the rayon thread pool.
    pub parallel: bool,
}

/// Validates tables against a schema registry.
///
/// Holds the per-run resolver cache; create one validator per run.
pub struct Validator<'a> {
    registry: &'a SchemaRegistry,
    resolver: CachedResolver<&'a dyn Resolver>,
    options: ValidationOptions,
}

impl<'a> Validator<'a> {
    pub fn new(registry: &'a SchemaRegistry, resolver: &'a dyn Resolver) -> Self {
        Self {
            registry,
            resolver: CachedResolver::new(resolver),
            options: ValidationOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: ValidationOptions) -> Self {
        self.options = options;
        self
    }

    /// Lookups forwarded to the external resolver so far.
    pub fn lookups(&self) -> usize {
        self.resolver.lookups()
    }

    /// Validate up to one table of each kind.
    pub fn validate(&self, tables: &[Table]) -> Result<ValidationReport> {
        let mut kinds: Vec<TableKind> = Vec::with_capacity(tables.len());
        for table in tables {
            if kinds.contains(&table.kind) {
                return Err(ValidateError::DuplicateTable { kind: table.kind });
            }
            kinds.push(table.kind);
        }
        self.registry.require(&kinds)?;

        info!(
            tables = tables.len(),
            parallel = self.options.parallel,
            "validation started"
        );

        let mut outcomes = Vec::with_capacity(tables.len());
        for table in tables {
            let columns = self.registry.columns_for(table.kind)?;
            let outcome = validate_table(table, columns, &self.resolver, self.options.parallel);
            debug!(table = %table.kind, rows = outcome.rows.len(), "row phase finished");
            outcomes.push((outcome, KeyColumns::from_columns(columns)));
        }

        let keyed = |kind: TableKind| {
            outcomes
                .iter()
                .find(|(outcome, _)| outcome.kind == kind)
                .map(|(outcome, keys)| KeyedTable {
                    outcome,
                    keys: keys.clone(),
                })
        };
        let entity = keyed(TableKind::Entity);
        let citation = keyed(TableKind::Citation);
        let relational = check_relations(entity.as_ref(), citation.as_ref());
        debug_assert!(relational.iter().all(|finding| finding.rule.is_relational()));
        debug!(findings = relational.len(), "relational phase finished");

        let mut findings = relational;
        for (outcome, _) in &outcomes {
            for row in &outcome.rows {
                findings.extend(row.findings.iter().cloned());
            }
        }

        let report = aggregate(findings, &FindingOrder::new(tables, self.registry));
        info!(
            issues = report.issues.len(),
            errors = report.error_count(),
            warnings = report.warning_count(),
            lookups = self.resolver.lookups(),
            "validation finished"
        );
        Ok(report)
    }
}

/// Validate tables with a fresh resolver cache.
pub fn validate(
    tables: &[Table],
    registry: &SchemaRegistry,
    resolver: &dyn Resolver,
    options: ValidationOptions,
) -> Result<ValidationReport> {
    Validator::new(registry, resolver)
        .with_options(options)
        .validate(tables)
}
