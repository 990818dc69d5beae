use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use ocv_cli::types::RunResult;
use ocv_model::{Issue, Location, Severity};

/// Locations listed in the issue table before eliding the rest.
const MAX_LOCATIONS: usize = 3;

pub fn print_summary(result: &RunResult) {
    if let Some(path) = &result.html_report {
        println!("HTML report: {}", path.display());
    }
    if let Some(path) = &result.json_report {
        println!("JSON report: {}", path.display());
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Table"),
        header_cell("Source"),
        header_cell("Rows"),
        header_cell("Errors"),
        header_cell("Warnings"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    let mut total_rows = 0usize;
    for summary in &result.tables {
        total_rows += summary.rows;
        table.add_row(vec![
            Cell::new(summary.kind.label())
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(&summary.name),
            Cell::new(summary.rows),
            count_cell(summary.errors, Color::Red),
            count_cell(summary.warnings, Color::Yellow),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(total_rows).add_attribute(Attribute::Bold),
        count_cell(result.report.error_count(), Color::Red).add_attribute(Attribute::Bold),
        count_cell(result.report.warning_count(), Color::Yellow).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
    if result.lookups > 0 {
        println!("External lookups: {}", result.lookups);
    }
    print_issue_table(result);
}

fn print_issue_table(result: &RunResult) {
    if result.report.is_empty() {
        println!("No issues found.");
        return;
    }
    let mut issues: Vec<&Issue> = result.report.issues.iter().collect();
    // Stable: report order is kept within each severity.
    issues.sort_by_key(|issue| std::cmp::Reverse(issue.severity));

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Severity"),
        header_cell("Rule"),
        header_cell("Count"),
        header_cell("Locations"),
        header_cell("Message"),
    ]);
    apply_issue_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Center);
    align_column(&mut table, 2, CellAlignment::Right);
    for issue in issues {
        table.add_row(vec![
            severity_cell(issue.severity),
            Cell::new(issue.rule.code()),
            Cell::new(issue.locations.len()),
            Cell::new(locations_text(&issue.locations)),
            Cell::new(&issue.message),
        ]);
    }
    println!();
    println!("Issues:");
    println!("{table}");
}

/// `cits:2:cited_id[1]`, with 1-based row numbers as shown in the report.
fn location_text(location: &Location) -> String {
    let mut text = format!("{}:{}:{}", location.table, location.row + 1, location.column);
    if let Some(item) = location.item {
        text.push_str(&format!("[{item}]"));
    }
    text
}

fn locations_text(locations: &[Location]) -> String {
    let mut parts: Vec<String> = locations
        .iter()
        .take(MAX_LOCATIONS)
        .map(location_text)
        .collect();
    if locations.len() > MAX_LOCATIONS {
        parts.push(format!("+{} more", locations.len() - MAX_LOCATIONS));
    }
    parts.join(", ")
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(120);
}

fn apply_issue_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(160);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn severity_cell(severity: Severity) -> Cell {
    match severity {
        Severity::Error => Cell::new("ERROR")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        Severity::Warning => Cell::new("WARN").fg(Color::Yellow),
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

pub fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

#[cfg(test)]
mod tests {
    use ocv_model::TableKind;

    use super::*;

    #[test]
    fn locations_are_one_based_and_elided() {
        let locations: Vec<Location> = (0..5)
            .map(|row| Location::cell(TableKind::Citation, row, "cited_id").with_item(Some(0)))
            .collect();
        assert_eq!(
            locations_text(&locations),
            "cits:1:cited_id[0], cits:2:cited_id[0], cits:3:cited_id[0], +2 more"
        );
    }

    #[test]
    fn whole_cell_location_has_no_item() {
        let location = Location::cell(TableKind::Entity, 4, "pub_date");
        assert_eq!(location_text(&location), "meta:5:pub_date");
    }
}
