//! Browsable HTML report.
//!
//! Every issue is listed with a marker carrying its id in `data-issue`.
//! Every affected cell (`<td>`) or list item (`<span class="item">`) lists the
//! ids touching it in a whitespace-separated `data-issues` attribute, which
//! the embedded script matches with `[data-issues~="<id>"]`.

use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use std::path::Path;

use ocv_model::{ColumnSpec, Issue, Table, TableKind, ValidationReport};
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

use crate::error::{ReportError, Result};
use crate::palette::issue_color;

const STYLE: &str = include_str!("../assets/report.css");
const SCRIPT: &str = include_str!("../assets/report.js");

/// A validated table together with its column contracts.
#[derive(Debug, Clone, Copy)]
pub struct ReportTable<'a> {
    pub table: &'a Table,
    pub columns: &'a [ColumnSpec],
}

#[derive(Debug, Default)]
struct CellMarks<'r> {
    cell: Vec<&'r str>,
    items: BTreeMap<usize, Vec<&'r str>>,
}

type Marks<'r> = HashMap<(TableKind, usize, &'r str), CellMarks<'r>>;

fn collect_marks(report: &ValidationReport) -> Marks<'_> {
    let mut marks: Marks<'_> = HashMap::new();
    for issue in &report.issues {
        for location in &issue.locations {
            let cell = marks
                .entry((location.table, location.row, location.column.as_str()))
                .or_default();
            let ids = match location.item {
                Some(item) => cell.items.entry(item).or_default(),
                None => &mut cell.cell,
            };
            if !ids.contains(&issue.id.as_str()) {
                ids.push(issue.id.as_str());
            }
        }
    }
    marks
}

/// Render the report, merging every table into one document.
pub fn render_html(report: &ValidationReport, tables: &[ReportTable<'_>]) -> Result<String> {
    let mut writer = Writer::new(b"<!DOCTYPE html>\n".to_vec());
    write_document(&mut writer, report, tables).map_err(ReportError::render)?;
    String::from_utf8(writer.into_inner()).map_err(ReportError::render)
}

pub fn write_html(path: &Path, report: &ValidationReport, tables: &[ReportTable<'_>]) -> Result<()> {
    let html = render_html(report, tables)?;
    std::fs::write(path, html).map_err(|e| ReportError::write(path, e))?;
    tracing::info!(
        path = %path.display(),
        issues = report.issues.len(),
        "HTML report written"
    );
    Ok(())
}

type XmlResult = std::result::Result<(), Box<dyn std::error::Error>>;

fn start<W: Write>(writer: &mut Writer<W>, name: &str, attrs: &[(&str, &str)]) -> XmlResult {
    let mut element = BytesStart::new(name);
    for attr in attrs {
        element.push_attribute(*attr);
    }
    writer.write_event(Event::Start(element))?;
    Ok(())
}

fn end<W: Write>(writer: &mut Writer<W>, name: &str) -> XmlResult {
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn text<W: Write>(writer: &mut Writer<W>, content: &str) -> XmlResult {
    writer.write_event(Event::Text(BytesText::new(content)))?;
    Ok(())
}

fn text_element<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    attrs: &[(&str, &str)],
    content: &str,
) -> XmlResult {
    start(writer, name, attrs)?;
    text(writer, content)?;
    end(writer, name)
}

/// Raw `<style>` / `<script>` body; these elements are not entity-decoded.
fn raw_element<W: Write>(writer: &mut Writer<W>, name: &str, content: &str) -> XmlResult {
    start(writer, name, &[])?;
    writer.write_event(Event::Text(BytesText::from_escaped(content)))?;
    end(writer, name)
}

fn write_document<W: Write>(
    writer: &mut Writer<W>,
    report: &ValidationReport,
    tables: &[ReportTable<'_>],
) -> XmlResult {
    start(writer, "html", &[("lang", "en")])?;

    start(writer, "head", &[])?;
    let mut meta = BytesStart::new("meta");
    meta.push_attribute(("charset", "utf-8"));
    writer.write_event(Event::Empty(meta))?;
    text_element(writer, "title", &[], "Validation report")?;
    raw_element(writer, "style", STYLE)?;
    end(writer, "head")?;

    start(writer, "body", &[])?;
    write_header(writer, report)?;

    if report.is_empty() {
        start(writer, "main", &[("class", "valid")])?;
        text_element(
            writer,
            "p",
            &[("class", "valid-message")],
            "No issues found: the submitted tables are valid.",
        )?;
        end(writer, "main")?;
    } else {
        start(writer, "main", &[])?;
        write_issue_list(writer, &report.issues)?;
        let marks = collect_marks(report);
        for table in tables {
            write_table(writer, table, &marks)?;
        }
        end(writer, "main")?;
        raw_element(writer, "script", SCRIPT)?;
    }

    end(writer, "body")?;
    end(writer, "html")
}

fn write_header<W: Write>(writer: &mut Writer<W>, report: &ValidationReport) -> XmlResult {
    start(writer, "header", &[("class", "report-header")])?;
    text_element(writer, "h1", &[], "Validation report")?;
    start(writer, "p", &[("class", "counts")])?;
    text_element(
        writer,
        "span",
        &[("class", "count error")],
        &plural(report.error_count(), "error"),
    )?;
    text(writer, " ")?;
    text_element(
        writer,
        "span",
        &[("class", "count warning")],
        &plural(report.warning_count(), "warning"),
    )?;
    end(writer, "p")?;
    end(writer, "header")
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

fn write_issue_list<W: Write>(writer: &mut Writer<W>, issues: &[Issue]) -> XmlResult {
    start(writer, "section", &[("class", "issue-list")])?;
    text_element(writer, "h2", &[], "Issues")?;
    start(writer, "ul", &[])?;
    for issue in issues {
        write_issue_item(writer, issue)?;
    }
    end(writer, "ul")?;
    end(writer, "section")
}

fn write_issue_item<W: Write>(writer: &mut Writer<W>, issue: &Issue) -> XmlResult {
    let class = format!("issue {}", issue.severity.label().to_lowercase());
    let style = format!("--issue-color: {}", issue_color(&issue.id));
    start(
        writer,
        "li",
        &[
            ("class", class.as_str()),
            ("data-issue", issue.id.as_str()),
            ("style", style.as_str()),
        ],
    )?;
    start(writer, "span", &[("class", "marker")])?;
    end(writer, "span")?;
    text_element(writer, "span", &[("class", "label")], issue.rule.code())?;
    text_element(writer, "span", &[("class", "message")], &issue.message)?;
    text_element(
        writer,
        "span",
        &[("class", "locations")],
        &plural(issue.locations.len(), "location"),
    )?;
    end(writer, "li")
}

/// Columns in display order: header order, then registered columns the
/// header lacks, then positional extras from ragged rows.
fn display_columns(table: &ReportTable<'_>) -> Vec<String> {
    let mut columns: Vec<String> = table.table.headers.clone();
    for spec in table.columns {
        if !columns.contains(&spec.name) {
            columns.push(spec.name.clone());
        }
    }
    for row in &table.table.rows {
        for name in row.columns() {
            if !columns.iter().any(|c| c == name) {
                columns.push(name.to_string());
            }
        }
    }
    columns
}

fn write_table<W: Write>(
    writer: &mut Writer<W>,
    table: &ReportTable<'_>,
    marks: &Marks<'_>,
) -> XmlResult {
    let kind = table.table.kind;
    let columns = display_columns(table);
    let flagged: Vec<usize> = table
        .table
        .rows
        .iter()
        .map(|row| row.index)
        .filter(|row| {
            columns
                .iter()
                .any(|column| marks.contains_key(&(kind, *row, column.as_str())))
        })
        .collect();

    start(writer, "div", &[("class", "general-info")])?;
    text_element(writer, "h2", &[], &table.table.display_name())?;
    text_element(
        writer,
        "p",
        &[],
        &format!(
            "{}: {}, {} with issues",
            kind.label(),
            plural(table.table.len(), "row"),
            flagged.len()
        ),
    )?;
    end(writer, "div")?;

    start(
        writer,
        "div",
        &[("class", "table-container"), ("data-table", kind.code())],
    )?;
    if flagged.is_empty() {
        end(writer, "div")?;
        return Ok(());
    }

    start(writer, "table", &[])?;
    start(writer, "thead", &[])?;
    start(writer, "tr", &[])?;
    text_element(writer, "th", &[], "#")?;
    for column in &columns {
        text_element(writer, "th", &[], column)?;
    }
    end(writer, "tr")?;
    end(writer, "thead")?;

    start(writer, "tbody", &[])?;
    for index in flagged {
        let Some(row) = table.table.rows.get(index) else {
            continue;
        };
        let row_id = format!("{}-{}", kind.code(), row.index);
        start(writer, "tr", &[("id", row_id.as_str())])?;
        text_element(writer, "th", &[("scope", "row")], &(row.index + 1).to_string())?;
        for column in &columns {
            let value = row.get(column).unwrap_or("");
            let spec = table.columns.iter().find(|spec| &spec.name == column);
            let cell_marks = marks.get(&(kind, row.index, column.as_str()));
            write_cell(writer, &row_id, column, value, spec, cell_marks)?;
        }
        end(writer, "tr")?;
    }
    end(writer, "tbody")?;
    end(writer, "table")?;
    end(writer, "div")
}

fn write_cell<W: Write>(
    writer: &mut Writer<W>,
    row_id: &str,
    column: &str,
    value: &str,
    spec: Option<&ColumnSpec>,
    marks: Option<&CellMarks<'_>>,
) -> XmlResult {
    let cell_ids = marks.map(|m| m.cell.join(" ")).unwrap_or_default();
    let mut attrs = vec![("data-column", column)];
    if !cell_ids.is_empty() {
        attrs.push(("data-issues", cell_ids.as_str()));
    }
    start(writer, "td", &attrs)?;

    let items = match spec {
        Some(spec) if spec.cardinality.is_list() => spec.cardinality.split(value),
        _ => Vec::new(),
    };
    if items.is_empty() {
        text(writer, value)?;
        return end(writer, "td");
    }

    let delimiter = spec.map(|s| s.cardinality.delimiter()).unwrap_or_default();
    for (idx, item) in items.iter().enumerate() {
        if idx > 0 {
            text(writer, delimiter)?;
        }
        let item_id = format!("{row_id}-{column}-{idx}");
        let item_ids = marks
            .and_then(|m| m.items.get(&idx))
            .map(|ids| ids.join(" "))
            .unwrap_or_default();
        let mut attrs = vec![("class", "item"), ("id", item_id.as_str())];
        if !item_ids.is_empty() {
            attrs.push(("data-issues", item_ids.as_str()));
        }
        text_element(writer, "span", &attrs, item)?;
    }
    end(writer, "td")
}
