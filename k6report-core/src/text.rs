//! Plain-text report output
//!
//! Same sections and ordering as the HTML report, laid out as fixed-width
//! columns for terminals and CI logs. Threshold status is spelled `OK` /
//! `FAILED` instead of being colored.

use crate::grouping::extract_group_metrics;
use crate::html::RenderOptions;
use crate::layout::{
    overall_metrics, summary_figures, threshold_rows, Column, GROUP_COLUMNS, OVERALL_COLUMNS,
};
use crate::summary::{count_display, MetricRecord, Summary};

const NAME_WIDTH: usize = 32;
const VALUE_WIDTH: usize = 12;

/// Render a summary as a plain-text report
pub fn render_text_report(summary: &Summary, options: &RenderOptions) -> String {
    let mut output = String::new();

    output.push_str(&format!("{}\n", options.title));
    output.push_str(&format!("Report generated: {}\n\n", options.generated_at));

    output.push_str("== Test Summary ==\n");
    for (label, value) in summary_figures(summary) {
        output.push_str(&format!("{:<24} {}\n", label, value));
    }

    output.push_str("\n== Overall Metrics ==\n");
    output.push_str(&header_line(OVERALL_COLUMNS));
    for (name, record) in overall_metrics(summary) {
        output.push_str(&metric_line(name, record, OVERALL_COLUMNS));
    }

    let grouped = extract_group_metrics(&summary.metrics);
    for (group, metrics) in &grouped {
        output.push_str(&format!("\n== Group: {} ==\n", group));
        output.push_str(&header_line(GROUP_COLUMNS));
        for (name, record) in metrics {
            output.push_str(&metric_line(name, record, GROUP_COLUMNS));
        }

        let rows = threshold_rows(metrics);
        if !rows.is_empty() {
            output.push_str("-- Thresholds --\n");
            output.push_str(&format!(
                "{:<w$} {:<w$} {}\n",
                "Metric",
                "Threshold",
                "Status",
                w = NAME_WIDTH
            ));
            for row in rows {
                output.push_str(&format!(
                    "{} {} {}\n",
                    truncate_or_pad(row.metric, NAME_WIDTH),
                    truncate_or_pad(row.expression, NAME_WIDTH),
                    row.status.as_str(),
                ));
            }
        }
    }

    for group in summary.check_groups() {
        output.push_str(&format!("\n== Checks for Group: {} ==\n", group.name));
        if group.checks.is_empty() {
            continue;
        }
        output.push_str(&format!(
            "{:<w$} {:<v$} {}\n",
            "Name",
            "Passes",
            "Fails",
            w = NAME_WIDTH,
            v = VALUE_WIDTH
        ));
        for check in &group.checks {
            output.push_str(&format!(
                "{} {:<v$} {}\n",
                truncate_or_pad(&check.name, NAME_WIDTH),
                count_display(check.passes),
                count_display(check.fails),
                v = VALUE_WIDTH
            ));
        }
    }

    output
}

fn header_line(columns: &[Column]) -> String {
    let mut line = format!("{:<w$}", "Metric", w = NAME_WIDTH);
    for column in columns {
        line.push_str(&format!(" {:<w$}", column.label, w = VALUE_WIDTH));
    }
    line.truncate(line.trim_end().len());
    line.push('\n');
    line
}

fn metric_line(name: &str, record: &MetricRecord, columns: &[Column]) -> String {
    let mut line = truncate_or_pad(name, NAME_WIDTH);
    for column in columns {
        line.push_str(&format!(
            " {:<w$}",
            record.stat(column.key).to_string(),
            w = VALUE_WIDTH
        ));
    }
    line.truncate(line.trim_end().len());
    line.push('\n');
    line
}

/// Truncate or pad string to fixed width
fn truncate_or_pad(s: &str, width: usize) -> String {
    if s.chars().count() > width {
        let kept: String = s.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        format!("{:<width$}", s, width = width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::parse_summary;

    #[test]
    fn test_truncate_or_pad() {
        assert_eq!(truncate_or_pad("abc", 5), "abc  ");
        assert_eq!(truncate_or_pad("abcdefgh", 6), "abc...");
    }

    #[test]
    fn test_text_report_sections() {
        let summary = parse_summary(
            r#"{
                "metrics": {
                    "http_reqs": {"values": {"count": 42}},
                    "http_req_duration{group:Get Posts}": {
                        "values": {"avg": 12.3, "p(95)": 50},
                        "thresholds": {"p(95)<500": {"ok": false}}
                    }
                },
                "root_group": {"groups": [{"name": "A", "checks": []}]}
            }"#,
        )
        .unwrap();
        let text = render_text_report(&summary, &RenderOptions::default());

        assert!(text.contains("== Overall Metrics =="));
        assert!(text.contains("== Group: Get Posts =="));
        assert!(text.contains("-- Thresholds --"));
        assert!(text.contains("FAILED"));
        assert!(text.ends_with("== Checks for Group: A ==\n"));

        let overall_line = text
            .lines()
            .find(|l| l.starts_with("http_reqs "))
            .unwrap();
        let cells: Vec<&str> = overall_line.split_whitespace().collect();
        assert_eq!(cells, vec!["http_reqs", "42", "-", "-", "-", "-", "-", "-"]);
    }

    #[test]
    fn test_threshold_expression_is_verbatim() {
        let summary = parse_summary(
            r#"{"metrics": {"d{group:G}": {"values": {}, "thresholds": {"p(95)<500": {"ok": true}}}}}"#,
        )
        .unwrap();
        let text = render_text_report(&summary, &RenderOptions::default());
        let row = text.lines().find(|l| l.contains("p(95)<500")).unwrap();
        assert!(row.ends_with("OK"));
    }
}
