//! Partitioning of metrics by their `{group:<name>}` tag
//!
//! k6 encodes sub-metrics as `<base>{<tag>:<value>}`. A metric whose name
//! carries a `group` tag belongs to exactly one group table; every other
//! metric belongs to the overall table.
//!
//! Multiple tags: the first `{group:...}` occurrence names the group and every
//! occurrence is stripped from the base name.

use crate::summary::MetricRecord;
use indexmap::IndexMap;
use regex::Regex;
use std::sync::OnceLock;

/// Literal prefix that marks a metric name as grouped
pub const GROUP_TAG_PREFIX: &str = "{group:";

/// Group name -> base metric name -> record, in first-seen order
pub type GroupedMetrics<'a> = IndexMap<String, IndexMap<String, &'a MetricRecord>>;

/// A parsed `{group:...}` tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupTag {
    pub group: String,
    pub base_name: String,
}

fn group_tag_re() -> &'static Regex {
    static GROUP_TAG_RE: OnceLock<Regex> = OnceLock::new();
    GROUP_TAG_RE.get_or_init(|| Regex::new(r"\{group:([^}]+)\}").unwrap())
}

/// True if the name contains the group tag prefix, well-formed or not
pub fn is_grouped_name(name: &str) -> bool {
    name.contains(GROUP_TAG_PREFIX)
}

/// Split a metric name into its group and tag-free base name
pub fn split_group_tag(name: &str) -> Option<GroupTag> {
    let re = group_tag_re();
    let caps = re.captures(name)?;
    let group = caps.get(1)?.as_str().to_string();
    let base_name = re.replace_all(name, "").into_owned();
    Some(GroupTag { group, base_name })
}

/// Build the per-group view of `metrics`
///
/// Metrics without a well-formed group tag are skipped here; they are
/// rendered by the overall table unless they contain the tag prefix.
pub fn extract_group_metrics(metrics: &IndexMap<String, MetricRecord>) -> GroupedMetrics<'_> {
    let mut grouped = GroupedMetrics::new();

    for (name, record) in metrics {
        match split_group_tag(name) {
            Some(tag) => {
                grouped
                    .entry(tag.group)
                    .or_default()
                    .insert(tag.base_name, record);
            }
            None if is_grouped_name(name) => {
                tracing::warn!(metric = %name, "malformed group tag, metric omitted from report");
            }
            None => {}
        }
    }

    grouped
}
