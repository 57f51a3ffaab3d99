//! k6report CLI - renders a k6 JSON summary as a grouped report

#![deny(warnings)]

// Global invariants enforced:
// - A missing summary produces no output file
// - Identical input yields byte-for-byte identical output (timestamp aside)

use anyhow::Context;
use clap::{Parser, Subcommand};
use k6report_core::config::{self, ResolvedConfig};
use k6report_core::writer::{default_output_path, DEFAULT_INPUT_FILE};
use k6report_core::{generate_report, ReportFormat};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "k6report")]
#[command(about = "Render a k6 JSON summary as an HTML report grouped by test group")]
#[command(version)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a report from a summary file
    Render {
        /// Path to the k6 summary JSON
        #[arg(long, default_value = DEFAULT_INPUT_FILE)]
        input: PathBuf,

        /// Output file path (default: next to the input, e.g. custom-report.html)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, default_value = "html")]
        format: OutputFormat,

        /// Path to config file (default: auto-discover next to the input)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Report title (overrides config file)
        #[arg(long)]
        title: Option<String>,

        /// Emit names without HTML escaping (overrides config file)
        #[arg(long)]
        no_escape: bool,

        /// Do not link an external stylesheet
        #[arg(long)]
        no_stylesheet: bool,
    },
    /// Validate a configuration file
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Validate a config file without rendering
    Validate {
        /// Path to config file (default: auto-discover from current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Show the resolved configuration (merged defaults + config file)
    Show {
        /// Path to config file (default: auto-discover from current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Html,
    Text,
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Html => ReportFormat::Html,
            OutputFormat::Text => ReportFormat::Text,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Render {
            input,
            output,
            format,
            config: config_path,
            title,
            no_escape,
            no_stylesheet,
        } => {
            // Checked before config discovery so a missing summary never
            // leaves a report behind.
            if !input.exists() {
                anyhow::bail!("summary file not found: {}", input.display());
            }

            let format = ReportFormat::from(format);
            let output = output.unwrap_or_else(|| default_output_path(&input, format.extension()));

            let mut resolved = config::load_and_resolve(input_dir(&input), config_path.as_deref())
                .context("failed to load configuration")?;
            if let Some(config_path) = &resolved.config_path {
                tracing::info!(path = %config_path.display(), "using config");
            }

            // CLI flags override config file values
            if let Some(title) = title {
                if title.trim().is_empty() {
                    anyhow::bail!("--title must not be empty");
                }
                resolved.title = title;
            }
            if no_escape {
                resolved.escape_html = false;
            }
            if no_stylesheet {
                resolved.stylesheet = None;
            }

            let generated_at = config::local_timestamp(&resolved.timestamp_format);
            let options = resolved.render_options(generated_at);

            let stats = generate_report(&input, &output, format, &options)
                .with_context(|| format!("failed to render report from {}", input.display()))?;

            eprintln!(
                "Wrote {} ({} overall metrics, {} groups, {} check groups)",
                output.display(),
                stats.overall_metrics,
                stats.groups,
                stats.check_groups
            );
        }
        Commands::Config { action } => handle_config(action)?,
    }

    Ok(())
}

fn handle_config(action: ConfigAction) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;
    match action {
        ConfigAction::Validate { path } => {
            let resolved = config::load_and_resolve(&cwd, path.as_deref())
                .context("configuration is invalid")?;
            match &resolved.config_path {
                Some(p) => println!("Config valid: {}", p.display()),
                None => println!("No config file found, defaults are valid"),
            }
        }
        ConfigAction::Show { path } => {
            let resolved = config::load_and_resolve(&cwd, path.as_deref())
                .context("failed to load configuration")?;
            print_resolved(&resolved);
        }
    }
    Ok(())
}

fn print_resolved(resolved: &ResolvedConfig) {
    match &resolved.config_path {
        Some(p) => println!("Config file: {}", p.display()),
        None => println!("Config file: (defaults)"),
    }
    println!("title:            {}", resolved.title);
    println!("escape_html:      {}", resolved.escape_html);
    println!(
        "stylesheet:       {}",
        resolved.stylesheet.as_deref().unwrap_or("(none)")
    );
    println!("timestamp_format: {}", resolved.timestamp_format);
}

/// Directory that holds the summary; config discovery starts here
fn input_dir(input: &Path) -> &Path {
    match input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "k6report=debug,k6report_core=debug"
    } else {
        "k6report=info,k6report_core=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
