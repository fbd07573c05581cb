//! Report files.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::Context;
use gpuval_core::ValidationReport;
use gpuval_report::{render_json, render_text};

/// JSON sibling of the text report: a trailing `.txt` becomes `.json`,
/// anything else gets `.json` appended.
#[must_use]
pub fn json_path(text_path: &Path) -> PathBuf {
    let stem = text_path
        .file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.strip_suffix(".txt"))
        .filter(|stem| !stem.is_empty());

    match stem {
        Some(stem) => text_path.with_file_name(format!("{stem}.json")),
        None => {
            let mut path = text_path.as_os_str().to_owned();
            path.push(".json");
            PathBuf::from(path)
        }
    }
}

/// Write the text report to `text_path` and the JSON report beside it.
///
/// If the text report cannot be written it is printed to stdout instead; a
/// failed JSON write is only logged.
///
/// # Errors
///
/// Returns an error if the report cannot be rendered.
pub fn write_reports(report: &ValidationReport, text_path: &Path) -> anyhow::Result<()> {
    let text = render_text(report).context("failed to render text report")?;
    let json = render_json(report).context("failed to render JSON report")?;

    match write_file(text_path, &text) {
        Ok(()) => tracing::info!("Validation report saved to {}", text_path.display()),
        Err(error) => {
            tracing::error!(
                "Failed to write report to {}: {error}",
                text_path.display()
            );
            println!("{text}");
        }
    }

    let json_path = json_path(text_path);
    match write_file(&json_path, &json) {
        Ok(()) => tracing::info!("JSON results saved to {}", json_path.display()),
        Err(error) => tracing::error!(
            "Failed to write JSON results to {}: {error}",
            json_path.display()
        ),
    }

    Ok(())
}

fn write_file(path: &Path, contents: &str) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)
}
