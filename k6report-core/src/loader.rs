//! Loading of the k6 summary document

use crate::summary::Summary;
use anyhow::{Context, Result};
use std::path::Path;

/// Read and parse the summary at `path`
///
/// # Errors
///
/// Returns error if:
/// - The file does not exist (checked before anything else, so callers never
///   produce output for a missing input)
/// - The file cannot be read
/// - The contents are not a valid summary document
pub fn load_summary(path: &Path) -> Result<Summary> {
    if !path.exists() {
        anyhow::bail!("summary file not found: {}", path.display());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read summary file: {}", path.display()))?;

    let summary = parse_summary(&content)
        .with_context(|| format!("failed to parse summary file: {}", path.display()))?;

    tracing::debug!(
        path = %path.display(),
        metrics = summary.metrics.len(),
        check_groups = summary.check_groups().len(),
        "loaded summary"
    );

    Ok(summary)
}

/// Parse a summary document held in memory
pub fn parse_summary(content: &str) -> Result<Summary> {
    let summary: Summary = serde_json::from_str(content)?;
    Ok(summary)
}
