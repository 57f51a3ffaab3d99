//! Typed model of the k6 `handleSummary` JSON document
//!
//! Only the fields the report reads are modelled; everything else k6 emits
//! (`type`, `contains`, `options`, ...) is ignored during deserialization.
//!
//! Global invariants enforced:
//! - Metric order is the order of the source document
//! - A missing statistic is a value (`StatValue::Absent`), never an error

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder rendered for any statistic that is not present
pub const PLACEHOLDER: &str = "-";

/// Root summary document produced by a k6 run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Summary {
    #[serde(default)]
    pub metrics: IndexMap<String, MetricRecord>,
    #[serde(default)]
    pub state: Option<RunState>,
    #[serde(default)]
    pub root_group: Option<CheckGroup>,
}

/// A single named measurement
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricRecord {
    #[serde(default)]
    pub values: IndexMap<String, StatValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thresholds: Option<IndexMap<String, ThresholdResult>>,
}

/// A statistic slot: either a number or explicitly absent
///
/// JSON `null` deserializes to `Absent`, as does a key that is not present
/// when looked up through [`MetricRecord::stat`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "Option<f64>", into = "Option<f64>")]
pub enum StatValue {
    Present(f64),
    Absent,
}

/// Outcome of a threshold expression evaluated by k6
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdResult {
    #[serde(default)]
    pub ok: bool,
}

/// Run-level state block
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunState {
    #[serde(rename = "testRunDurationMs", default)]
    pub test_run_duration_ms: Option<f64>,
}

/// A k6 group with its checks and nested groups
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckGroup {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub checks: Vec<CheckResult>,
    #[serde(default)]
    pub groups: Vec<CheckGroup>,
}

/// Pass/fail counters of a single check
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckResult {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub passes: Option<u64>,
    #[serde(default)]
    pub fails: Option<u64>,
}

impl From<Option<f64>> for StatValue {
    fn from(value: Option<f64>) -> Self {
        match value {
            Some(v) => StatValue::Present(v),
            None => StatValue::Absent,
        }
    }
}

impl From<StatValue> for Option<f64> {
    fn from(value: StatValue) -> Self {
        value.as_f64()
    }
}

impl StatValue {
    pub fn as_f64(self) -> Option<f64> {
        match self {
            StatValue::Present(v) => Some(v),
            StatValue::Absent => None,
        }
    }
}

impl fmt::Display for StatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatValue::Present(v) => f.write_str(&format_number(*v)),
            StatValue::Absent => f.write_str(PLACEHOLDER),
        }
    }
}

/// Shortest round-trip form, switching to exponent notation for magnitudes
/// of at least 1e21 or below 1e-6 (`1e+21`, `1.5e-7`)
fn format_number(v: f64) -> String {
    let magnitude = v.abs();
    if v != 0.0 && (magnitude >= 1e21 || magnitude < 1e-6) {
        let exp = format!("{:e}", v);
        match exp.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => {
                format!("{}e+{}", mantissa, power)
            }
            _ => exp,
        }
    } else {
        format!("{}", v)
    }
}

impl MetricRecord {
    /// Look up a statistic; missing keys are `Absent`
    pub fn stat(&self, key: &str) -> StatValue {
        self.values.get(key).copied().unwrap_or(StatValue::Absent)
    }

    /// True when the metric carries at least one threshold result
    pub fn has_thresholds(&self) -> bool {
        self.thresholds.as_ref().is_some_and(|t| !t.is_empty())
    }
}

impl Summary {
    pub fn metric(&self, name: &str) -> Option<&MetricRecord> {
        self.metrics.get(name)
    }

    /// `metrics[name].values[key]`, or `Absent` if either level is missing
    pub fn stat(&self, name: &str, key: &str) -> StatValue {
        get_metric_value(self.metric(name), key)
    }

    /// Groups directly below the root group, in source order
    pub fn check_groups(&self) -> &[CheckGroup] {
        self.root_group
            .as_ref()
            .map(|root| root.groups.as_slice())
            .unwrap_or(&[])
    }

    /// Run duration as seconds with two decimals (e.g. `60.02s`)
    ///
    /// A zero duration counts as not recorded.
    pub fn duration_display(&self) -> String {
        match self.state.as_ref().and_then(|s| s.test_run_duration_ms) {
            // Ties round away from zero (`0.125` -> `0.13`)
            Some(ms) if ms != 0.0 => format!("{:.2}s", (ms / 10.0).round() / 100.0),
            _ => PLACEHOLDER.to_string(),
        }
    }
}

/// Read a statistic from an optional metric record
pub fn get_metric_value(record: Option<&MetricRecord>, key: &str) -> StatValue {
    record.map(|r| r.stat(key)).unwrap_or(StatValue::Absent)
}

/// Render an optional counter, using the placeholder when missing
pub fn count_display(count: Option<u64>) -> String {
    count
        .map(|c| c.to_string())
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}
