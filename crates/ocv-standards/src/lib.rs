#![deny(unsafe_code)]

//! Schema registry for OpenCitations-style tables.
//!
//! The registry is built once from a TOML document (the embedded OpenCitations
//! schema by default) and is read-only afterwards, so it can be shared freely
//! between validation threads.

pub mod config;
pub mod error;
pub mod registry;

pub use crate::config::SchemaDocument;
pub use crate::error::{ConfigError, Result};
pub use crate::registry::{ResolverSettings, SchemaRegistry};
