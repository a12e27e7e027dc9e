// Output formatting: plain text lines, JSON, and the colored terminal table.

pub mod terminal;
pub mod text;

use anyhow::{Context, Result};
use clap::ValueEnum;
use std::path::Path;

use crate::selection::SelectionReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// `category term=score ...` lines followed by the vocabulary line
    Text,
    /// The full report as pretty-printed JSON
    Json,
    /// Colored per-category tables
    Table,
}

/// Render the report in a file-friendly format. `Table` is terminal-only and
/// falls back to text.
pub fn render(report: &SelectionReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text | OutputFormat::Table => Ok(text::render(report)),
        OutputFormat::Json => {
            serde_json::to_string_pretty(report).context("Failed to serialize report")
        }
    }
}

/// Write the rendered report to `path`, creating parent directories.
pub fn write_report(report: &SelectionReport, format: OutputFormat, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let rendered = render(report, format)?;
    std::fs::write(path, rendered).with_context(|| format!("Failed to write {}", path.display()))
}
