//! Output formatting for reconciliation reports.
//!
//! Supports multiple output formats: table, JSON, and plain text summary,
//! each restricted to one of the report views.

use crate::analyzer::rules::rule_description;
use crate::analyzer::types::{HealthRating, IndexReport, Report, Severity, format_days};
use colored::{ColoredString, Colorize};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeSet;

/// Maximum rows in the errors section.
const MAX_ERROR_ROWS: usize = 20;

/// Issues shown per index row before truncating.
const MAX_ISSUES_PER_ROW: usize = 2;

const RULE: &str = "═══════════════════════════════════════════════════════════════════════════════════════════════════";

// ============================================================================
// Output Format and View
// ============================================================================

/// Output format for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Console tables (default)
    #[default]
    Table,
    /// JSON format
    Json,
    /// Plain text summary
    Summary,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "table" => Some(Self::Table),
            "json" => Some(Self::Json),
            "summary" => Some(Self::Summary),
            _ => None,
        }
    }
}

/// Which parts of the report to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportView {
    /// Policies, indices, errors, recommendations and health
    #[default]
    Full,
    /// Policy table and health only
    Policies,
    /// Errored indices and health only
    Errors,
    /// Recommendations only
    Recommendations,
}

impl ReportView {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "full" => Some(Self::Full),
            "policies" => Some(Self::Policies),
            "errors" => Some(Self::Errors),
            "recommendations" => Some(Self::Recommendations),
            _ => None,
        }
    }

    fn shows_policies(self) -> bool {
        matches!(self, Self::Full | Self::Policies)
    }

    fn shows_indices(self) -> bool {
        self == Self::Full
    }

    fn shows_errors(self) -> bool {
        matches!(self, Self::Full | Self::Errors)
    }

    fn shows_recommendations(self) -> bool {
        matches!(self, Self::Full | Self::Recommendations)
    }

    fn shows_health(self) -> bool {
        self != Self::Recommendations
    }
}

// ============================================================================
// Formatting Functions
// ============================================================================

/// Format a report to string.
pub fn format_report_to_string(report: &Report, format: OutputFormat, view: ReportView) -> String {
    match format {
        OutputFormat::Table => format_table(report, view),
        OutputFormat::Json => format_json(report, view),
        OutputFormat::Summary => format_summary(report),
    }
}

/// Format and print a report.
pub fn format_report(report: &Report, format: OutputFormat, view: ReportView) {
    println!("{}", format_report_to_string(report, format, view));
}

// ============================================================================
// Table Format
// ============================================================================

fn format_table(report: &Report, view: ReportView) -> String {
    let mut output = String::new();

    output.push_str(&format!("\n{}\n", RULE.bright_blue()));
    output.push_str(&format!(
        "{} {}\n",
        "📋 ILM POLICY HEALTH REPORT".bright_white().bold(),
        format!("(ilm-health v{})", crate::VERSION).dimmed()
    ));
    output.push_str(&format!("{}\n", RULE.bright_blue()));

    if view.shows_policies() {
        output.push_str(&format_policies_section(report));
    }
    if view.shows_indices() {
        output.push_str(&format_indices_section(report));
    }
    if view.shows_errors() {
        output.push_str(&format_errors_section(report));
    }
    if view.shows_recommendations() {
        output.push_str(&format_recommendations_section(report));
    }
    if view.shows_health() {
        output.push_str(&format_health_section(report));
    }

    output.push_str(&format!("\n{}\n", RULE.bright_blue()));
    output
}

fn section_header(title: &str) -> String {
    format!("\n{}\n", format!("┌─ {} ", title).bright_blue())
}

fn format_policies_section(report: &Report) -> String {
    let mut output = section_header(&format!("ILM Policies ({})", report.summaries.len()));

    output.push_str(&format!(
        "{}\n",
        format!(
            "{:<40} {:<10} {:>8} {:>7} {:>9} {:<11} {}",
            "Policy", "Retention", "Indices", "Issues", "Avg Age", "Modified", "Lifecycle"
        )
        .dimmed()
    ));

    for summary in &report.summaries {
        let name = format!("{:<40}", truncate(&summary.policy_name, 40));
        let name = if summary.resolved {
            name.bright_white()
        } else {
            name.red()
        };
        let issues = summary.issue_count + summary.policy_issues.len();
        let issues = format!("{:>7}", issues);
        let modified = summary
            .last_modified
            .map(|ts| ts.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "N/A".to_string());
        let lifecycle = if summary.resolved {
            summary.lifecycle.clone()
        } else {
            "(policy not found)".to_string()
        };

        output.push_str(&format!(
            "{} {:<10} {:>8} {} {:>9} {:<11} {}\n",
            name,
            summary.retention.to_string(),
            summary.index_count,
            if issues.trim() == "0" {
                issues.green()
            } else {
                issues.yellow()
            },
            summary
                .avg_age_days
                .map(format_days)
                .unwrap_or_else(|| "-".to_string()),
            modified,
            lifecycle.dimmed()
        ));
    }

    output
}

fn format_indices_section(report: &Report) -> String {
    let mut output = section_header(&format!("Index Status ({})", report.reports.len()));

    output.push_str(&format!(
        "{}\n",
        format!(
            "{:<50} {:<25} {:<8} {:>8} {:<10} {:<8} {}",
            "Index", "Policy", "Phase", "Age", "Retention", "Status", "Issues"
        )
        .dimmed()
    ));

    for index in &report.reports {
        let mut issues: Vec<&str> = index
            .issues
            .iter()
            .take(MAX_ISSUES_PER_ROW)
            .map(|i| i.kind.as_str())
            .collect();
        if index.issues.len() > MAX_ISSUES_PER_ROW {
            issues.push("...");
        }

        output.push_str(&format!(
            "{:<50} {:<25} {:<8} {:>8} {:<10} {} {}\n",
            truncate(&index.display_name, 50),
            truncate(index.policy_name.as_deref().unwrap_or("-"), 25),
            index.current_phase,
            age_label(index),
            index
                .retention_days
                .map(format_days)
                .unwrap_or_else(|| "-".to_string()),
            status_label(index),
            issues.join("; ")
        ));
    }

    output
}

fn format_errors_section(report: &Report) -> String {
    let errored = report.errored_reports();

    if errored.is_empty() {
        return format!("\n{}\n", "✅ No ILM errors found".green());
    }

    let mut output = section_header(&format!("ILM Errors ({})", errored.len()));
    output.push_str(&format!(
        "{}\n",
        format!(
            "{:<40} {:<25} {:<8} {:>8} {}",
            "Index", "Policy", "Phase", "Age", "Error"
        )
        .dimmed()
    ));

    for index in errored.iter().take(MAX_ERROR_ROWS) {
        let message = index
            .issues
            .iter()
            .find(|i| i.severity == Severity::Error)
            .map(|i| i.message.as_str())
            .unwrap_or_default();

        output.push_str(&format!(
            "{:<40} {:<25} {:<8} {:>8} {}\n",
            truncate(&index.display_name, 40),
            truncate(index.policy_name.as_deref().unwrap_or("-"), 25),
            index.current_phase,
            age_label(index),
            truncate(message, 100).red()
        ));
    }

    if errored.len() > MAX_ERROR_ROWS {
        output.push_str(&format!(
            "{}\n",
            format!("... and {} more", errored.len() - MAX_ERROR_ROWS).dimmed()
        ));
    }

    output
}

fn format_recommendations_section(report: &Report) -> String {
    let recommendations = report.recommendations();

    if recommendations.is_empty() {
        return format!("\n{}\n", "✅ No recommendations".green());
    }

    let mut output = section_header("Recommendations");

    for (i, rec) in recommendations.iter().enumerate() {
        let scope = if rec.affected_indices > 0 {
            format!(" ({} indices)", rec.affected_indices)
        } else {
            String::new()
        };

        output.push_str(&format!(
            "{:2}. {} {} '{}': {}{}\n",
            i + 1,
            severity_label(rec.severity),
            rec.rule_code.as_str().dimmed(),
            rec.subject.bright_white(),
            rec.message,
            scope.dimmed()
        ));
    }

    let codes: BTreeSet<&str> = recommendations.iter().map(|r| r.rule_code.as_str()).collect();
    output.push_str(&format!("\n{}\n", "Rules:".dimmed()));
    for code in codes {
        output.push_str(&format!(
            "    {}",
            format!("{}  {}\n", code, rule_description(code)).dimmed()
        ));
    }

    output
}

fn format_health_section(report: &Report) -> String {
    let health = &report.health;
    let score = format!("{:.1}% {}", health.score, health.rating);
    let score = match health.rating {
        HealthRating::Excellent => score.bright_green(),
        HealthRating::Good => score.green(),
        HealthRating::Fair => score.yellow(),
        HealthRating::Poor => score.red(),
    };

    format!(
        "\n🩺 {} {}\n{}\n",
        "HEALTH:".bold(),
        score.bold(),
        format!(
            "Total: {} indices, Errors: {}",
            health.total_indices, health.errored_indices
        )
        .dimmed()
    )
}

fn severity_label(severity: Severity) -> ColoredString {
    let label = format!("[{}]", severity);
    match severity {
        Severity::Error => label.red(),
        Severity::Warning => label.yellow(),
        Severity::Info => label.blue(),
    }
}

fn status_label(index: &IndexReport) -> ColoredString {
    let label = format!("{:<8}", index.status());
    match index.max_severity() {
        None => label.green(),
        Some(Severity::Info) => label.blue(),
        Some(Severity::Warning) => label.yellow(),
        Some(Severity::Error) => label.red(),
    }
}

fn age_label(index: &IndexReport) -> String {
    index
        .age_days
        .map(format_days)
        .unwrap_or_else(|| "-".to_string())
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let mut short: String = value.chars().take(width.saturating_sub(1)).collect();
    short.push('…');
    short
}

// ============================================================================
// JSON Format
// ============================================================================

fn format_json(report: &Report, view: ReportView) -> String {
    let value = match view {
        ReportView::Full => serde_json::to_value(report),
        ReportView::Policies => Ok(json!({
            "summaries": report.summaries,
            "health": report.health,
        })),
        ReportView::Errors => Ok(json!({
            "errors": report.errored_reports(),
            "health": report.health,
        })),
        ReportView::Recommendations => Ok(json!({
            "recommendations": report.recommendations(),
        })),
    };

    value
        .and_then(|v| serde_json::to_string_pretty(&v))
        .unwrap_or_else(|_| "{}".to_string())
}

// ============================================================================
// Summary Format
// ============================================================================

fn format_summary(report: &Report) -> String {
    let mut output = String::new();

    let unbounded = report
        .summaries
        .iter()
        .filter(|s| s.resolved && s.retention_days.is_none())
        .count();
    let dangling = report.summaries.iter().filter(|s| !s.resolved).count();

    output.push_str("▶ ILM HEALTH SUMMARY\n");
    output.push_str("──────────────────────────────────────────────────\n");
    output.push_str(&format!(
        "│ Policies: {} ({} without fixed retention, {} missing)\n",
        report.summaries.len(),
        unbounded,
        dangling
    ));
    output.push_str(&format!("│ Indices: {}\n", report.reports.len()));
    output.push_str(&format!(
        "│ Issues: {} ({} indices with errors)\n",
        report.issue_count(),
        report.health.errored_indices
    ));
    output.push_str(&format!(
        "│ Health: {:.1}% {}\n",
        report.health.score, report.health.rating
    ));
    output.push_str("──────────────────────────────────────────────────\n");

    output
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{IlmHealthConfig, run};
    use serde_json::Value;
    use std::collections::BTreeMap;

    fn sample_report() -> Report {
        let mut policies = BTreeMap::new();
        policies.insert(
            "logs-app".to_string(),
            json!({ "policy": { "phases": { "hot": {}, "delete": { "min_age": "30d" } } } }),
        );
        let mut explain = BTreeMap::new();
        explain.insert(
            "logs-app-2024.09.27-000001".to_string(),
            json!({ "policy": "logs-app", "phase": "hot", "age": "2d" }),
        );
        explain.insert(
            "orphan-000001".to_string(),
            json!({ "policy": "missing-policy", "phase": "delete", "age": "40d" }),
        );
        run(&policies, &explain, &IlmHealthConfig::default())
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!(OutputFormat::parse("table"), Some(OutputFormat::Table));
        assert_eq!(OutputFormat::parse("JSON"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::parse("summary"), Some(OutputFormat::Summary));
        assert_eq!(OutputFormat::parse("yaml"), None);
        assert_eq!(ReportView::parse("errors"), Some(ReportView::Errors));
    }

    #[test]
    fn test_format_table_full() {
        let table = format_table(&sample_report(), ReportView::Full);
        assert!(table.contains("ILM POLICY HEALTH REPORT"));
        assert!(table.contains("ILM Policies (2)"));
        assert!(table.contains("logs-app"));
        assert!(table.contains("ILM Errors (1)"));
        assert!(table.contains("Recommendations"));
        assert!(table.contains("HEALTH:"));
        assert!(table.contains(crate::VERSION));
    }

    #[test]
    fn test_recommendations_list_rule_descriptions() {
        let table = format_table(&sample_report(), ReportView::Recommendations);
        assert!(table.contains("ILM-001"));
        assert!(table.contains("Index references a policy missing from the policy set"));
    }

    #[test]
    fn test_format_table_recommendations_only() {
        let table = format_table(&sample_report(), ReportView::Recommendations);
        assert!(table.contains("Recommendations"));
        assert!(!table.contains("ILM Policies"));
        assert!(!table.contains("HEALTH:"));
    }

    #[test]
    fn test_format_json_views() {
        let report = sample_report();

        let full: Value = serde_json::from_str(&format_json(&report, ReportView::Full)).unwrap();
        assert!(full.get("summaries").is_some());
        assert!(full.get("reports").is_some());

        let errors: Value = serde_json::from_str(&format_json(&report, ReportView::Errors)).unwrap();
        assert_eq!(errors["errors"].as_array().unwrap().len(), 1);
        assert_eq!(errors["errors"][0]["issues"][0]["kind"], "DANGLING_POLICY");
    }

    #[test]
    fn test_format_summary() {
        let summary = format_summary(&sample_report());
        assert!(summary.contains("ILM HEALTH SUMMARY"));
        assert!(summary.contains("Indices: 2"));
        assert!(summary.contains("Health: 50.0% POOR"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
    }
}
