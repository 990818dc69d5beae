//! Load, validate and report: the stages behind `ocv validate`.

use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::{info, info_span};

use ocv_ingest::load_table;
use ocv_model::{Table, ValidationReport};
use ocv_report::{ReportTable, write_html, write_json};
use ocv_standards::SchemaRegistry;
use ocv_validate::{HttpResolver, OfflineResolver, Resolver, ValidationOptions, Validator};

use crate::types::{InputSpec, RunOptions, RunResult, TableSummary};

/// The schema document at `path`, or the embedded OpenCitations schema.
pub fn load_registry(path: Option<&Path>) -> Result<SchemaRegistry> {
    match path {
        Some(path) => SchemaRegistry::load(path)
            .with_context(|| format!("load schema {}", path.display())),
        None => SchemaRegistry::opencitations().context("load embedded schema"),
    }
}

pub fn load_inputs(inputs: &[InputSpec], registry: &SchemaRegistry) -> Result<Vec<Table>> {
    inputs
        .iter()
        .map(|input| {
            load_table(&input.path, input.kind, registry)
                .with_context(|| format!("load {}", input.path.display()))
        })
        .collect()
}

pub fn build_resolver(options: &RunOptions, registry: &SchemaRegistry) -> Result<Box<dyn Resolver>> {
    if options.offline {
        info!("external identifier checks disabled");
        return Ok(Box::new(OfflineResolver));
    }
    let mut settings = registry.resolver().clone();
    if let Some(timeout) = options.timeout {
        settings.timeout = timeout;
    }
    let resolver = HttpResolver::new(&settings).context("build identifier resolver")?;
    Ok(Box::new(resolver))
}

/// Per-table row and issue counts.
pub fn summarize_tables(tables: &[Table], report: &ValidationReport) -> Vec<TableSummary> {
    tables
        .iter()
        .map(|table| {
            let touching = || {
                report
                    .issues
                    .iter()
                    .filter(|issue| issue.touches(table.kind))
            };
            let errors = touching().filter(|issue| issue.is_error()).count();
            TableSummary {
                kind: table.kind,
                name: table.display_name(),
                rows: table.len(),
                errors,
                warnings: touching().count() - errors,
            }
        })
        .collect()
}

pub fn write_reports(
    options: &RunOptions,
    report: &ValidationReport,
    tables: &[Table],
    registry: &SchemaRegistry,
) -> Result<()> {
    if let Some(path) = &options.html_report {
        let report_tables = tables
            .iter()
            .map(|table| {
                Ok(ReportTable {
                    table,
                    columns: registry.columns_for(table.kind)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        write_html(path, report, &report_tables)
            .with_context(|| format!("write HTML report {}", path.display()))?;
    }
    if let Some(path) = &options.json_report {
        write_json(path, report)
            .with_context(|| format!("write JSON report {}", path.display()))?;
    }
    Ok(())
}

/// Run a full validation over the given inputs.
pub fn run_validation(inputs: &[InputSpec], options: &RunOptions) -> Result<RunResult> {
    let span = info_span!("run", inputs = inputs.len());
    let _guard = span.enter();
    if inputs.is_empty() {
        bail!("no input tables given");
    }

    let registry = load_registry(options.schema.as_deref())?;
    let tables = load_inputs(inputs, &registry)?;
    let resolver = build_resolver(options, &registry)?;

    let validator = Validator::new(&registry, &*resolver).with_options(ValidationOptions {
        parallel: options.parallel,
    });
    let report = validator.validate(&tables).context("validate tables")?;
    let lookups = validator.lookups();

    write_reports(options, &report, &tables, &registry)?;

    Ok(RunResult {
        tables: summarize_tables(&tables, &report),
        report,
        html_report: options.html_report.clone(),
        json_report: options.json_report.clone(),
        lookups,
    })
}
