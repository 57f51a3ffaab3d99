//! Configuration file support for k6report
//!
//! Loads presentation settings from JSON files.
//!
//! Search order (relative to the directory holding the summary file):
//! 1. Explicit path (--config CLI flag)
//! 2. `.k6reportrc.json`
//! 3. `k6report.config.json`
//! 4. `"k6report"` key in `package.json`
//!
//! All fields are optional. CLI flags take precedence over config file values.

use crate::html::{RenderOptions, DEFAULT_STYLESHEET, DEFAULT_TITLE};
use anyhow::{Context, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default format of the "Report generated" timestamp
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// k6report configuration loaded from a JSON config file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
    /// Document title and top-level heading
    #[serde(default)]
    pub title: Option<String>,

    /// Escape metric, group and check names (default: true)
    #[serde(default)]
    pub escape_html: Option<bool>,

    /// External stylesheet URL (default: Pure.css from unpkg)
    #[serde(default)]
    pub stylesheet: Option<String>,

    /// strftime pattern for the generation timestamp
    #[serde(default)]
    pub timestamp_format: Option<String>,
}

/// Configuration with defaults applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub title: String,
    pub escape_html: bool,
    pub stylesheet: Option<String>,
    pub timestamp_format: String,
    /// Path the config was loaded from (None if defaults)
    pub config_path: Option<PathBuf>,
}

impl ReportConfig {
    /// Validate the configuration for logical errors
    pub fn validate(&self) -> Result<()> {
        if let Some(ref title) = self.title {
            if title.trim().is_empty() {
                anyhow::bail!("title must not be empty");
            }
        }

        if let Some(ref stylesheet) = self.stylesheet {
            if stylesheet.trim().is_empty() {
                anyhow::bail!("stylesheet must not be empty when set");
            }
        }

        if let Some(ref format) = self.timestamp_format {
            validate_timestamp_format(format)
                .with_context(|| format!("invalid timestamp_format: {:?}", format))?;
        }

        Ok(())
    }

    /// Resolve config into the form used by the renderers
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        self.validate()?;

        Ok(ResolvedConfig {
            title: self
                .title
                .clone()
                .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            escape_html: self.escape_html.unwrap_or(true),
            stylesheet: Some(
                self.stylesheet
                    .clone()
                    .unwrap_or_else(|| DEFAULT_STYLESHEET.to_string()),
            ),
            timestamp_format: self
                .timestamp_format
                .clone()
                .unwrap_or_else(|| DEFAULT_TIMESTAMP_FORMAT.to_string()),
            config_path: None,
        })
    }
}

impl ResolvedConfig {
    /// Build a ResolvedConfig with all defaults (no config file)
    pub fn defaults() -> Result<Self> {
        ReportConfig::default().resolve()
    }

    /// Render options for a report generated at `generated_at`
    pub fn render_options(&self, generated_at: String) -> RenderOptions {
        RenderOptions {
            title: self.title.clone(),
            generated_at,
            stylesheet: self.stylesheet.clone(),
            escape_html: self.escape_html,
        }
    }
}

fn validate_timestamp_format(format: &str) -> Result<()> {
    if format.is_empty() {
        anyhow::bail!("format must not be empty");
    }
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        anyhow::bail!("unsupported strftime specifier");
    }
    Ok(())
}

/// Format `now` with a validated strftime pattern
pub fn format_timestamp<Tz>(now: &DateTime<Tz>, format: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    now.format(format).to_string()
}

/// Current local time formatted with `format`
pub fn local_timestamp(format: &str) -> String {
    format_timestamp(&chrono::Local::now(), format)
}

/// Discover and load a config file from `dir`
///
/// Search order:
/// 1. `.k6reportrc.json`
/// 2. `k6report.config.json`
/// 3. `"k6report"` key in `package.json`
///
/// Returns `None` if no config file is found (use defaults).
pub fn discover_config(dir: &Path) -> Result<Option<(ReportConfig, PathBuf)>> {
    for name in [".k6reportrc.json", "k6report.config.json"] {
        let path = dir.join(name);
        if path.exists() {
            let config = load_config_file(&path)?;
            return Ok(Some((config, path)));
        }
    }

    let pkg_path = dir.join("package.json");
    if pkg_path.exists() {
        if let Some(config) = load_from_package_json(&pkg_path)? {
            return Ok(Some((config, pkg_path)));
        }
    }

    Ok(None)
}

/// Load config from an explicit file path
pub fn load_config_file(path: &Path) -> Result<ReportConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;

    let config: ReportConfig = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse config file: {}", path.display()))?;

    config
        .validate()
        .with_context(|| format!("invalid config in: {}", path.display()))?;

    Ok(config)
}

/// Load k6report config from the "k6report" key in package.json
fn load_from_package_json(path: &Path) -> Result<Option<ReportConfig>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    let pkg: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse {}", path.display()))?;

    match pkg.get("k6report") {
        Some(value) => {
            let config: ReportConfig = serde_json::from_value(value.clone())
                .with_context(|| format!("invalid k6report config in {}", path.display()))?;
            config
                .validate()
                .with_context(|| format!("invalid k6report config in {}", path.display()))?;
            Ok(Some(config))
        }
        None => Ok(None),
    }
}

/// Load and resolve config
///
/// If `config_path` is provided, loads from that file.
/// Otherwise, discovers config in `dir`.
/// Returns default config if nothing is found.
pub fn load_and_resolve(dir: &Path, config_path: Option<&Path>) -> Result<ResolvedConfig> {
    let (config, source_path) = if let Some(path) = config_path {
        let config = load_config_file(path)?;
        (config, Some(path.to_path_buf()))
    } else {
        match discover_config(dir)? {
            Some((config, path)) => (config, Some(path)),
            None => (ReportConfig::default(), None),
        }
    };

    let mut resolved = config.resolve()?;
    resolved.config_path = source_path;
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::fs;

    #[test]
    fn test_default_config_is_valid() {
        let resolved = ResolvedConfig::defaults().expect("default config should resolve");
        assert_eq!(resolved.title, DEFAULT_TITLE);
        assert!(resolved.escape_html);
        assert_eq!(resolved.stylesheet.as_deref(), Some(DEFAULT_STYLESHEET));
        assert_eq!(resolved.timestamp_format, DEFAULT_TIMESTAMP_FORMAT);
        assert!(resolved.config_path.is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let json = r#"{
            "title": "Nightly API Load Test",
            "escape_html": false,
            "stylesheet": "https://example.com/report.css",
            "timestamp_format": "%d/%m/%Y %H:%M"
        }"#;
        let config: ReportConfig = serde_json::from_str(json).unwrap();
        let resolved = config.resolve().unwrap();
        assert_eq!(resolved.title, "Nightly API Load Test");
        assert!(!resolved.escape_html);
        assert_eq!(
            resolved.stylesheet.as_deref(),
            Some("https://example.com/report.css")
        );
        assert_eq!(resolved.timestamp_format, "%d/%m/%Y %H:%M");
    }

    #[test]
    fn test_reject_unknown_fields() {
        let json = r#"{"unknown_field": true}"#;
        let result: Result<ReportConfig, _> = serde_json::from_str(json);
        assert!(result.is_err(), "unknown fields should be rejected");
    }

    #[test]
    fn test_reject_empty_title() {
        let config: ReportConfig = serde_json::from_str(r#"{"title": "  "}"#).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_reject_bad_timestamp_format() {
        let config: ReportConfig =
            serde_json::from_str(r#"{"timestamp_format": "%Y %!"}"#).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_format_timestamp() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 8, 5, 3).unwrap();
        assert_eq!(
            format_timestamp(&now, DEFAULT_TIMESTAMP_FORMAT),
            "2026-10-19 08:05:03"
        );
    }

    #[test]
    fn test_render_options_from_config() {
        let resolved = ResolvedConfig::defaults().unwrap();
        let options = resolved.render_options("then".to_string());
        assert_eq!(options.title, DEFAULT_TITLE);
        assert_eq!(options.generated_at, "then");
        assert!(options.escape_html);
    }

    #[test]
    fn test_discover_rc_file_first() {
        let temp = tempfile::TempDir::new().unwrap();
        fs::write(temp.path().join(".k6reportrc.json"), r#"{"title": "From RC"}"#).unwrap();
        fs::write(
            temp.path().join("k6report.config.json"),
            r#"{"title": "From config"}"#,
        )
        .unwrap();

        let resolved = load_and_resolve(temp.path(), None).unwrap();
        assert_eq!(resolved.title, "From RC");
        assert_eq!(
            resolved.config_path,
            Some(temp.path().join(".k6reportrc.json"))
        );
    }

    #[test]
    fn test_discover_package_json_key() {
        let temp = tempfile::TempDir::new().unwrap();
        fs::write(
            temp.path().join("package.json"),
            r#"{"name": "load-tests", "k6report": {"escape_html": false}}"#,
        )
        .unwrap();

        let resolved = load_and_resolve(temp.path(), None).unwrap();
        assert!(!resolved.escape_html);
    }

    #[test]
    fn test_package_json_without_key_uses_defaults() {
        let temp = tempfile::TempDir::new().unwrap();
        fs::write(temp.path().join("package.json"), r#"{"name": "load-tests"}"#).unwrap();

        let resolved = load_and_resolve(temp.path(), None).unwrap();
        assert!(resolved.config_path.is_none());
        assert_eq!(resolved.title, DEFAULT_TITLE);
    }

    #[test]
    fn test_explicit_path_wins() {
        let temp = tempfile::TempDir::new().unwrap();
        fs::write(temp.path().join(".k6reportrc.json"), r#"{"title": "From RC"}"#).unwrap();
        let explicit = temp.path().join("custom.json");
        fs::write(&explicit, r#"{"title": "Explicit"}"#).unwrap();

        let resolved = load_and_resolve(temp.path(), Some(&explicit)).unwrap();
        assert_eq!(resolved.title, "Explicit");
    }

    #[test]
    fn test_invalid_config_file_is_an_error() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("k6report.config.json");
        fs::write(&path, r#"{"stylesheet": ""}"#).unwrap();
        assert!(load_and_resolve(temp.path(), None).is_err());
    }
}
