//! Report layout shared by the HTML and text renderers
//!
//! Decides which figures, columns and rows appear in each section. The
//! renderers only decide how they look.

use crate::grouping::{is_grouped_name, GroupedMetrics};
use crate::summary::{MetricRecord, Summary};

/// A statistic column: header label and `values` key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub label: &'static str,
    pub key: &'static str,
}

const fn column(label: &'static str, key: &'static str) -> Column {
    Column { label, key }
}

/// Columns of the overall metrics table
pub const OVERALL_COLUMNS: &[Column] = &[
    column("Count", "count"),
    column("Rate", "rate"),
    column("Avg", "avg"),
    column("Max", "max"),
    column("Min", "min"),
    column("p(90)", "p(90)"),
    column("p(95)", "p(95)"),
];

/// Columns of each per-group metrics table (no `rate`)
pub const GROUP_COLUMNS: &[Column] = &[
    column("Count", "count"),
    column("Avg", "avg"),
    column("Max", "max"),
    column("Min", "min"),
    column("p(90)", "p(90)"),
    column("p(95)", "p(95)"),
];

/// Status of a threshold row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdStatus {
    Ok,
    Failed,
}

impl ThresholdStatus {
    pub fn from_ok(ok: bool) -> Self {
        if ok {
            ThresholdStatus::Ok
        } else {
            ThresholdStatus::Failed
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ThresholdStatus::Ok => "OK",
            ThresholdStatus::Failed => "FAILED",
        }
    }
}

/// One (metric, threshold expression) pair of a group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThresholdRow<'a> {
    pub metric: &'a str,
    pub expression: &'a str,
    pub status: ThresholdStatus,
}

/// The seven headline figures of the Test Summary section, in display order
pub fn summary_figures(summary: &Summary) -> Vec<(&'static str, String)> {
    vec![
        ("Duration", summary.duration_display()),
        ("Max VUs", summary.stat("vus", "max").to_string()),
        (
            "Total Requests",
            summary.stat("http_reqs", "count").to_string(),
        ),
        ("Checks Passed", summary.stat("checks", "passes").to_string()),
        ("Checks Failed", summary.stat("checks", "fails").to_string()),
        (
            "Data Sent (bytes)",
            summary.stat("data_sent", "count").to_string(),
        ),
        (
            "Data Received (bytes)",
            summary.stat("data_received", "count").to_string(),
        ),
    ]
}

/// Metrics that belong to the overall table, in source order
pub fn overall_metrics(summary: &Summary) -> impl Iterator<Item = (&str, &MetricRecord)> {
    summary
        .metrics
        .iter()
        .filter(|(name, _)| !is_grouped_name(name))
        .map(|(name, record)| (name.as_str(), record))
}

/// Threshold rows for the metrics of one group
///
/// Empty when no metric of the group carries thresholds.
pub fn threshold_rows<'a>(
    metrics: &'a indexmap::IndexMap<String, &'a MetricRecord>,
) -> Vec<ThresholdRow<'a>> {
    metrics
        .iter()
        .filter(|(_, record)| record.has_thresholds())
        .flat_map(|(name, record)| {
            record
                .thresholds
                .iter()
                .flatten()
                .map(move |(expression, result)| ThresholdRow {
                    metric: name.as_str(),
                    expression: expression.as_str(),
                    status: ThresholdStatus::from_ok(result.ok),
                })
        })
        .collect()
}

/// Total number of base metrics across all groups
pub fn grouped_metric_count(grouped: &GroupedMetrics<'_>) -> usize {
    grouped.values().map(|metrics| metrics.len()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grouping::extract_group_metrics;
    use crate::loader::parse_summary;

    #[test]
    fn test_summary_figures_with_empty_summary() {
        let figures = summary_figures(&Summary::default());
        assert_eq!(figures.len(), 7);
        assert!(figures.iter().all(|(_, value)| value == "-"));
    }

    #[test]
    fn test_summary_figures_order() {
        let labels: Vec<&str> = summary_figures(&Summary::default())
            .into_iter()
            .map(|(label, _)| label)
            .collect();
        assert_eq!(
            labels,
            vec![
                "Duration",
                "Max VUs",
                "Total Requests",
                "Checks Passed",
                "Checks Failed",
                "Data Sent (bytes)",
                "Data Received (bytes)",
            ]
        );
    }

    #[test]
    fn test_overall_skips_grouped_names() {
        let summary = parse_summary(
            r#"{"metrics": {
                "http_reqs": {"values": {"count": 42}},
                "http_req_duration{group:Get Posts}": {"values": {"avg": 12.3}},
                "broken{group:}": {"values": {}}
            }}"#,
        )
        .unwrap();
        let names: Vec<&str> = overall_metrics(&summary).map(|(n, _)| n).collect();
        assert_eq!(names, vec!["http_reqs"]);
    }

    #[test]
    fn test_threshold_rows() {
        let summary = parse_summary(
            r#"{"metrics": {
                "http_req_duration{group:Get Posts}": {
                    "values": {},
                    "thresholds": {"p(95)<500": {"ok": false}, "avg<200": {"ok": true}}
                },
                "http_reqs{group:Get Posts}": {"values": {"count": 3}}
            }}"#,
        )
        .unwrap();
        let grouped = extract_group_metrics(&summary.metrics);
        let rows = threshold_rows(&grouped["Get Posts"]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].metric, "http_req_duration");
        assert_eq!(rows[0].expression, "p(95)<500");
        assert_eq!(rows[0].status, ThresholdStatus::Failed);
        assert_eq!(rows[1].status, ThresholdStatus::Ok);
    }

    #[test]
    fn test_group_columns_have_no_rate() {
        assert!(OVERALL_COLUMNS.iter().any(|c| c.key == "rate"));
        assert!(!GROUP_COLUMNS.iter().any(|c| c.key == "rate"));
    }
}
