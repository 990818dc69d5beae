#![deny(unsafe_code)]

//! Report rendering.
//!
//! - **HTML**: one self-contained document covering every validated table,
//!   with clickable issue markers that highlight the affected cells.
//! - **JSON**: the serialized [`ValidationReport`](ocv_model::ValidationReport).

pub mod error;
mod html;
mod json;
mod palette;

pub use error::{ReportError, Result};
pub use html::{ReportTable, render_html, write_html};
pub use json::{render_json, write_json};
pub use palette::issue_color;
