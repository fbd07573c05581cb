//! # gpuval-report
//!
//! Renders a [`ValidationReport`] for people and for machines.
//!
//! [`render_text`] produces the sectioned plain-text report written to the
//! `--output` path; [`render_json`] produces the pretty-printed JSON written
//! next to it. Check names in the text come from the same serde
//! representation as the JSON keys.

mod error;
mod text;

pub use error::ReportError;
pub use text::{MAX_LISTED_ANOMALIES, render_text};

use gpuval_core::ValidationReport;

/// Pretty JSON with keys in declaration order; sections that did not run
/// are omitted.
///
/// # Errors
///
/// Returns `ReportError::Serialize` if the report cannot be serialized.
pub fn render_json(report: &ValidationReport) -> Result<String, ReportError> {
    Ok(serde_json::to_string_pretty(report)?)
}
