//! CLI library components for the OpenCitations validator.

pub mod logging;
pub mod pipeline;
pub mod types;
