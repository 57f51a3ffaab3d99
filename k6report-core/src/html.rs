//! HTML report generation
//!
//! Generates a self-contained HTML report with embedded CSS. Sections are
//! emitted in a fixed order: summary, overall metrics, per-group metrics and
//! thresholds, per-group checks.

use crate::grouping::{extract_group_metrics, GroupedMetrics};
use crate::layout::{
    overall_metrics, summary_figures, threshold_rows, Column, ThresholdStatus, GROUP_COLUMNS,
    OVERALL_COLUMNS,
};
use crate::summary::{count_display, CheckGroup, MetricRecord, Summary};
use indexmap::IndexMap;
use std::borrow::Cow;

/// Default document title
pub const DEFAULT_TITLE: &str = "K6 Grouped Metrics Report";

/// Default external stylesheet (Pure.css table styles)
pub const DEFAULT_STYLESHEET: &str = "https://unpkg.com/purecss@2.0.3/build/pure-min.css";

/// Presentation options for a single render
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub title: String,
    /// Pre-formatted generation timestamp
    pub generated_at: String,
    pub stylesheet: Option<String>,
    /// Escape interpolated names; disable to emit them verbatim
    pub escape_html: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            title: DEFAULT_TITLE.to_string(),
            generated_at: String::new(),
            stylesheet: Some(DEFAULT_STYLESHEET.to_string()),
            escape_html: true,
        }
    }
}

impl RenderOptions {
    fn text<'a>(&self, s: &'a str) -> Cow<'a, str> {
        if self.escape_html {
            Cow::Owned(html_escape(s))
        } else {
            Cow::Borrowed(s)
        }
    }
}

/// Render a summary as an HTML report
pub fn render_html_report(summary: &Summary, options: &RenderOptions) -> String {
    let grouped = extract_group_metrics(&summary.metrics);
    let stylesheet = options
        .stylesheet
        .as_deref()
        .map(|href| format!(r#"<link rel="stylesheet" href="{}">"#, html_escape(href)))
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    {stylesheet}
    <style>{css}</style>
</head>
<body>
    <h1>{title}</h1>
    <div class="generated">Report generated: <b>{generated_at}</b></div>
{summary}
{overall}
{groups}
{checks}
</body>
</html>
"#,
        title = options.text(&options.title),
        stylesheet = stylesheet,
        css = inline_css(),
        generated_at = options.text(&options.generated_at),
        summary = render_summary(summary),
        overall = render_overall_metrics(summary, options),
        groups = render_groups(&grouped, options),
        checks = render_check_groups(summary.check_groups(), options),
    )
}

/// Inline CSS styles
fn inline_css() -> &'static str {
    r#"
body { margin: 2rem; font-family: system-ui, -apple-system, 'Segoe UI', sans-serif; color: #111827; }
h2 { margin-top: 2rem; }
table { width: 100%; margin-bottom: 2rem; border-collapse: collapse; }
th, td { text-align: left; padding: 0.3rem 0.8rem; }
.summary-table td { padding: 0.2rem 1rem; }
.generated { color: #555; margin-bottom: 1.5rem; }
.status-ok { color: green; font-weight: 600; }
.status-failed { color: red; font-weight: 600; }
"#
}

/// Render the Test Summary section
fn render_summary(summary: &Summary) -> String {
    let rows: String = summary_figures(summary)
        .into_iter()
        .map(|(label, value)| format!("<tr><td><b>{}</b></td><td>{}</td></tr>\n", label, value))
        .collect();

    format!(
        r#"<h2>Test Summary</h2>
<table class="pure-table summary-table"><tbody>
{rows}</tbody></table>"#,
        rows = rows,
    )
}

/// Render the Overall Metrics table (untagged metrics only)
fn render_overall_metrics(summary: &Summary, options: &RenderOptions) -> String {
    let rows: String = overall_metrics(summary)
        .map(|(name, record)| render_metric_row(name, record, OVERALL_COLUMNS, options))
        .collect();

    format!(
        "<h2>Overall Metrics</h2>\n{}",
        render_metrics_table(OVERALL_COLUMNS, &rows)
    )
}

/// Render metrics and thresholds for every group, interleaved per group
fn render_groups(grouped: &GroupedMetrics<'_>, options: &RenderOptions) -> String {
    grouped
        .iter()
        .map(|(group, metrics)| {
            let rows: String = metrics
                .iter()
                .map(|(name, record)| render_metric_row(name, record, GROUP_COLUMNS, options))
                .collect();
            format!(
                "<h2>Group: {}</h2>\n{}{}",
                options.text(group),
                render_metrics_table(GROUP_COLUMNS, &rows),
                render_thresholds(metrics, options),
            )
        })
        .collect()
}

/// Render the thresholds table of one group, or nothing if it has none
fn render_thresholds(metrics: &IndexMap<String, &MetricRecord>, options: &RenderOptions) -> String {
    let rows = threshold_rows(metrics);
    if rows.is_empty() {
        return String::new();
    }

    let body: String = rows
        .iter()
        .map(|row| {
            let (class, color) = match row.status {
                ThresholdStatus::Ok => ("status-ok", "green"),
                ThresholdStatus::Failed => ("status-failed", "red"),
            };
            format!(
                "<tr><td>{}</td><td>{}</td><td class=\"{}\" style=\"color:{}\">{}</td></tr>\n",
                options.text(row.metric),
                options.text(row.expression),
                class,
                color,
                row.status.as_str(),
            )
        })
        .collect();

    format!(
        r#"<h3>Thresholds</h3>
<table class="pure-table pure-table-striped"><thead><tr><th>Metric</th><th>Threshold</th><th>Status</th></tr></thead><tbody>
{body}</tbody></table>
"#,
        body = body,
    )
}

/// Render a heading per root check group, with a checks table when non-empty
fn render_check_groups(groups: &[CheckGroup], options: &RenderOptions) -> String {
    groups
        .iter()
        .map(|group| {
            format!(
                "<h2>Checks for Group: {}</h2>\n{}",
                options.text(&group.name),
                render_checks_table(group, options),
            )
        })
        .collect()
}

fn render_checks_table(group: &CheckGroup, options: &RenderOptions) -> String {
    if group.checks.is_empty() {
        return String::new();
    }

    let rows: String = group
        .checks
        .iter()
        .map(|check| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                options.text(&check.name),
                count_display(check.passes),
                count_display(check.fails),
            )
        })
        .collect();

    format!(
        r#"<h3>Checks</h3>
<table class="pure-table pure-table-striped"><thead><tr><th>Name</th><th>Passes</th><th>Fails</th></tr></thead><tbody>
{rows}</tbody></table>
"#,
        rows = rows,
    )
}

fn render_metrics_table(columns: &[Column], rows: &str) -> String {
    let headers: String = columns
        .iter()
        .map(|c| format!("<th>{}</th>", c.label))
        .collect();

    format!(
        r#"<table class="pure-table pure-table-striped"><thead><tr><th>Metric</th>{headers}</tr></thead><tbody>
{rows}</tbody></table>
"#,
        headers = headers,
        rows = rows,
    )
}

fn render_metric_row(
    name: &str,
    record: &MetricRecord,
    columns: &[Column],
    options: &RenderOptions,
) -> String {
    let cells: String = columns
        .iter()
        .map(|c| format!("<td>{}</td>", record.stat(c.key)))
        .collect();
    format!("<tr><td>{}</td>{}</tr>\n", options.text(name), cells)
}

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
