//! k6report core library - grouped HTML and text reports from k6 JSON summaries

#![deny(warnings)]

// Global invariants enforced in this crate:
// - Single pass: read the whole summary, transform, write the whole report
// - No global mutable state
// - Rendering is a pure function of (summary, render options)
// - Metric and group order follow the source document
// - Identical input yields byte-for-byte identical output

pub mod config;
pub mod grouping;
pub mod html;
pub mod layout;
pub mod loader;
pub mod summary;
pub mod text;
pub mod writer;

pub use config::ResolvedConfig;
pub use grouping::{extract_group_metrics, GroupedMetrics};
pub use html::{render_html_report, RenderOptions};
pub use loader::{load_summary, parse_summary};
pub use summary::{get_metric_value, MetricRecord, StatValue, Summary};
pub use text::render_text_report;

use anyhow::Result;
use std::path::Path;

/// Output format of a rendered report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Html,
    Text,
}

impl ReportFormat {
    /// File extension used for default output paths
    pub fn extension(self) -> &'static str {
        match self {
            ReportFormat::Html => "html",
            ReportFormat::Text => "txt",
        }
    }
}

/// Counts describing what went into a rendered report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportStats {
    pub overall_metrics: usize,
    pub groups: usize,
    pub grouped_metrics: usize,
    pub check_groups: usize,
}

impl ReportStats {
    pub fn for_summary(summary: &Summary) -> Self {
        let grouped = extract_group_metrics(&summary.metrics);
        ReportStats {
            overall_metrics: layout::overall_metrics(summary).count(),
            groups: grouped.len(),
            grouped_metrics: layout::grouped_metric_count(&grouped),
            check_groups: summary.check_groups().len(),
        }
    }
}

/// Render a summary in the requested format
pub fn render_report(summary: &Summary, format: ReportFormat, options: &RenderOptions) -> String {
    match format {
        ReportFormat::Html => render_html_report(summary, options),
        ReportFormat::Text => render_text_report(summary, options),
    }
}

/// Load `input`, render it and write the report to `output`
///
/// Nothing is written unless the summary loads successfully, and the
/// summary itself is never overwritten.
pub fn generate_report(
    input: &Path,
    output: &Path,
    format: ReportFormat,
    options: &RenderOptions,
) -> Result<ReportStats> {
    let summary = load_summary(input)?;
    if writer::same_file(input, output) {
        anyhow::bail!(
            "output path {} is the input summary; choose a different --output",
            output.display()
        );
    }
    let report = render_report(&summary, format, options);
    writer::atomic_write(output, &report)?;

    let stats = ReportStats::for_summary(&summary);
    tracing::debug!(
        input = %input.display(),
        output = %output.display(),
        overall_metrics = stats.overall_metrics,
        groups = stats.groups,
        check_groups = stats.check_groups,
        "report generated"
    );
    Ok(stats)
}
