use std::path::Path;

use ocv_model::ValidationReport;

use crate::error::{ReportError, Result};

/// Pretty-printed JSON of the report.
pub fn render_json(report: &ValidationReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

pub fn write_json(path: &Path, report: &ValidationReport) -> Result<()> {
    let json = render_json(report)?;
    std::fs::write(path, json).map_err(|e| ReportError::write(path, e))?;
    tracing::info!(path = %path.display(), "JSON report written");
    Ok(())
}
