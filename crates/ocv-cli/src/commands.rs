use std::time::Duration;

use anyhow::Result;
use comfy_table::{Cell, Table};

use ocv_cli::pipeline::{load_registry, run_validation};
use ocv_cli::types::{InputSpec, RunOptions, RunResult};
use ocv_model::{ColumnSpec, KeyRole, TableKind};

use crate::cli::{SchemaArgs, ValidateArgs};
use crate::summary::{apply_table_style, dim_cell};

pub fn run_schema(args: &SchemaArgs) -> Result<()> {
    let registry = load_registry(args.schema.as_deref())?;
    match &registry.version {
        Some(version) => println!("Schema: {} {version}", registry.name),
        None => println!("Schema: {}", registry.name),
    }
    let mut table = Table::new();
    table.set_header(vec![
        "Table",
        "Column",
        "Type",
        "Cardinality",
        "Required",
        "Key",
        "Resolved",
    ]);
    apply_table_style(&mut table);
    for kind in registry.table_kinds() {
        for spec in registry.columns_for(kind)? {
            table.add_row(schema_row(kind, spec));
        }
    }
    println!("{table}");
    Ok(())
}

fn schema_row(kind: TableKind, spec: &ColumnSpec) -> Vec<Cell> {
    let cardinality = if spec.cardinality.is_list() {
        format!("list '{}'", spec.cardinality.delimiter())
    } else {
        "single".to_string()
    };
    let key = match spec.role {
        Some(KeyRole::Primary) => Cell::new("primary"),
        Some(KeyRole::Citing) => Cell::new("citing"),
        Some(KeyRole::Cited) => Cell::new("cited"),
        None => dim_cell("-"),
    };
    vec![
        Cell::new(kind.label()),
        Cell::new(&spec.name),
        Cell::new(spec.semantic.tag()),
        Cell::new(cardinality),
        flag_cell(spec.required),
        key,
        flag_cell(spec.resolve),
    ]
}

fn flag_cell(flag: bool) -> Cell {
    if flag { Cell::new("yes") } else { dim_cell("-") }
}

pub fn run_validate(args: &ValidateArgs) -> Result<RunResult> {
    let mut inputs: Vec<InputSpec> = args.inputs.iter().map(InputSpec::detect).collect();
    if let Some(path) = &args.entities {
        inputs.push(InputSpec::with_kind(path, TableKind::Entity));
    }
    if let Some(path) = &args.citations {
        inputs.push(InputSpec::with_kind(path, TableKind::Citation));
    }
    let options = RunOptions {
        schema: args.schema.clone(),
        html_report: Some(args.report.clone()),
        json_report: args.json.clone(),
        offline: args.offline,
        parallel: args.parallel,
        timeout: args.timeout.map(Duration::from_secs),
    };
    run_validation(&inputs, &options)
}
