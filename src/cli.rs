use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::analyzer::{OutputFormat, ReportView};

#[derive(Parser)]
#[command(name = "ilm-health")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Reconcile ILM policies against index lifecycle state")]
#[command(long_about = "Reads ILM policy definitions and ILM explain output from a cluster diagnostic bundle, joins every index with the policy that governs it, and reports effective retention, lifecycle errors and policy recommendations.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a diagnostic bundle and report ILM health
    Analyze {
        /// Bundle directory containing ilm_policies.json and ilm_explain.json
        #[arg(value_name = "BUNDLE_DIR", default_value = ".")]
        path: PathBuf,

        /// Policies file (overrides the bundle directory)
        #[arg(long, value_name = "FILE", requires = "explain")]
        policies: Option<PathBuf>,

        /// Explain file (overrides the bundle directory)
        #[arg(long, value_name = "FILE", requires = "policies")]
        explain: Option<PathBuf>,

        /// Errors-only explain file overlaid on the explain entries
        #[arg(long, value_name = "FILE")]
        errors: Option<PathBuf>,

        /// Output format (table, json, summary)
        #[arg(short, long, value_parser = parse_output_format)]
        format: Option<OutputFormat>,

        /// Which part of the report to show (full, policies, errors, recommendations)
        #[arg(long, value_parser = parse_report_view)]
        view: Option<ReportView>,

        /// Only show indices past the rollover phases (delete and unknown phases)
        #[arg(long)]
        policies_only: bool,

        /// Multiplier applied to the expected hot-phase age
        #[arg(long, value_name = "FACTOR", value_parser = parse_multiplier)]
        staleness_multiplier: Option<f64>,

        /// Minimum severity to report (info, warning, error)
        #[arg(long)]
        severity: Option<String>,

        /// Rule codes to ignore (e.g. ILM-006,ILM-101)
        #[arg(long, value_delimiter = ',')]
        ignore: Vec<String>,

        /// Hide system policies (metrics, agent, event log) and internal indices
        #[arg(long)]
        hide_system: bool,

        /// Report indices not managed by ILM
        #[arg(long)]
        report_unmanaged: bool,

        /// Write the rendered report to a file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Export the full report as JSON ("auto" picks ilm_YYYYmmdd_HHMMSS.json)
        #[arg(long, value_name = "FILE|auto")]
        export: Option<String>,

        /// Export only the indices with issues as JSON
        #[arg(long, value_name = "FILE")]
        export_issues: Option<PathBuf>,
    },
}

fn parse_output_format(value: &str) -> Result<OutputFormat, String> {
    OutputFormat::parse(value)
        .ok_or_else(|| format!("unknown format '{}' (expected table, json or summary)", value))
}

fn parse_report_view(value: &str) -> Result<ReportView, String> {
    ReportView::parse(value).ok_or_else(|| {
        format!(
            "unknown view '{}' (expected full, policies, errors or recommendations)",
            value
        )
    })
}

fn parse_multiplier(value: &str) -> Result<f64, String> {
    let multiplier: f64 = value
        .parse()
        .map_err(|_| format!("'{}' is not a number", value))?;
    if !multiplier.is_finite() || multiplier <= 0.0 {
        return Err(format!("must be a positive number, got {}", value));
    }
    Ok(multiplier)
}

impl Cli {
    /// Initialize logging based on verbosity level
    pub fn init_logging(&self) {
        if self.quiet {
            return;
        }

        let level = match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };

        env_logger::Builder::from_default_env()
            .filter_level(level)
            .init();
    }
}
