//! Handler for the `analyze` command.
//!
//! Loads the diagnostic bundle, runs the reconciliation and renders or
//! exports the report.

use crate::analyzer::{
    IlmHealthConfig, OutputFormat, Report, ReportView, Severity, export_issues, export_report,
    format_report, format_report_to_string, rule_codes, run,
};
use crate::analyzer::formatter::auto_export_path;
use crate::bundle::DiagnosticBundle;
use crate::config::Config;
use crate::error::Result;
use std::path::{Path, PathBuf};

/// Export file name that selects a timestamped name.
const AUTO_EXPORT: &str = "auto";

/// Configuration for the analyze command
#[derive(Debug, Clone, Default)]
pub struct AnalyzeOptions {
    /// Explicit policies file
    pub policies: Option<PathBuf>,
    /// Explicit explain file
    pub explain: Option<PathBuf>,
    /// Explicit errors-only explain file
    pub errors: Option<PathBuf>,
    /// Output format (falls back to the config file)
    pub format: Option<OutputFormat>,
    /// Report view (falls back to the config file)
    pub view: Option<ReportView>,
    /// Drop indices still in rollover phases
    pub policies_only: bool,
    pub staleness_multiplier: Option<f64>,
    /// Minimum severity to report
    pub severity: Option<String>,
    /// Rule codes to ignore
    pub ignore: Vec<String>,
    /// Hide system policies and internal indices
    pub hide_system: bool,
    /// Report indices not managed by ILM
    pub report_unmanaged: bool,
    /// Output file for the rendered report
    pub output: Option<PathBuf>,
    /// Full JSON export (`auto` for a timestamped name)
    pub export: Option<String>,
    /// Issues-only JSON export
    pub export_issues: Option<PathBuf>,
}

/// Handle the `analyze` command.
pub fn handle_analyze(path: &Path, options: AnalyzeOptions, config: Config) -> Result<Report> {
    let bundle = resolve_bundle(path, &options)?;
    let policies = bundle.load_policies()?;
    let explain = bundle.load_explain()?;

    let analysis = build_analysis_config(config.analysis, &options);
    let report = run(&policies, &explain, &analysis);

    let format = options.format.unwrap_or(config.output.format);
    let view = options.view.unwrap_or(config.output.view);

    if let Some(output_path) = &options.output {
        let output = format_report_to_string(&report, format, view);
        std::fs::write(output_path, output)?;
        println!("Report written to: {}", output_path.display());
    } else {
        format_report(&report, format, view);
    }

    if let Some(export) = &options.export {
        let export_path = if export == AUTO_EXPORT {
            auto_export_path(chrono::Local::now())
        } else {
            PathBuf::from(export)
        };
        export_report(&report, &export_path)?;
        println!("Report exported to: {}", export_path.display());
    }

    if let Some(issues_path) = &options.export_issues {
        let count = export_issues(&report, issues_path)?;
        println!(
            "Exported {} indices with issues to: {}",
            count,
            issues_path.display()
        );
    }

    Ok(report)
}

fn resolve_bundle(path: &Path, options: &AnalyzeOptions) -> Result<DiagnosticBundle> {
    let bundle = match (&options.policies, &options.explain) {
        (Some(policies), Some(explain)) => DiagnosticBundle::from_files(policies, explain),
        _ => DiagnosticBundle::from_dir(path)?,
    };

    Ok(match &options.errors {
        Some(errors) => bundle.with_errors(errors),
        None => bundle,
    })
}

/// Apply command-line overrides on top of the config file values.
fn build_analysis_config(mut config: IlmHealthConfig, options: &AnalyzeOptions) -> IlmHealthConfig {
    if options.policies_only {
        config = config.with_exclude_noisy_phases(true);
    }

    if let Some(multiplier) = options.staleness_multiplier {
        config = config.with_staleness_multiplier(multiplier);
    }

    if let Some(severity_str) = &options.severity {
        match Severity::parse(severity_str) {
            Some(severity) => config = config.with_severity(severity),
            None => log::warn!("Unknown severity '{}', keeping {}", severity_str, config.min_severity),
        }
    }

    for rule in &options.ignore {
        if rule_codes::MANDATORY.contains(&rule.as_str()) {
            log::warn!("Rule {} is always evaluated and cannot be ignored", rule);
        }
        config = config.ignore_rule(rule.as_str());
    }

    if options.hide_system {
        config = config.hide_system();
    }

    if options.report_unmanaged {
        config = config.with_unmanaged();
    }

    config
}
