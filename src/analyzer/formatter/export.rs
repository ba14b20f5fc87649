//! JSON export of reconciliation reports.

use crate::analyzer::types::{HealthScore, IndexReport, Issue, PolicySummary, Recommendation, Report};
use crate::error::Result;
use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Full report document written by [`export_report`].
#[derive(Debug, Serialize)]
struct ReportExport<'a> {
    generated_at: DateTime<Utc>,
    tool_version: &'static str,
    health: &'a HealthScore,
    summaries: &'a [PolicySummary],
    reports: &'a [IndexReport],
    recommendations: Vec<Recommendation>,
}

/// Issues-only document written by [`export_issues`].
#[derive(Debug, Serialize)]
struct IssuesExport<'a> {
    generated_at: DateTime<Utc>,
    total_indices_with_issues: usize,
    indices: Vec<IndexIssues<'a>>,
}

#[derive(Debug, Serialize)]
struct IndexIssues<'a> {
    index: &'a str,
    policy: Option<&'a str>,
    current_phase: &'a str,
    age_days: Option<f64>,
    issues: &'a [Issue],
}

/// Default export file name for the given local time: `ilm_YYYYmmdd_HHMMSS.json`.
pub fn auto_export_path(now: DateTime<Local>) -> PathBuf {
    PathBuf::from(format!("ilm_{}.json", now.format("%Y%m%d_%H%M%S")))
}

/// Write the full report as pretty JSON.
pub fn export_report(report: &Report, path: &Path) -> Result<()> {
    let document = ReportExport {
        generated_at: Utc::now(),
        tool_version: crate::VERSION,
        health: &report.health,
        summaries: &report.summaries,
        reports: &report.reports,
        recommendations: report.recommendations(),
    };

    write_json(&document, path)?;
    log::info!("Exported report to {}", path.display());
    Ok(())
}

/// Write every index that has at least one issue. Returns the number written.
pub fn export_issues(report: &Report, path: &Path) -> Result<usize> {
    let indices: Vec<IndexIssues> = report
        .reports
        .iter()
        .filter(|r| !r.is_healthy())
        .map(|r| IndexIssues {
            index: &r.index_name,
            policy: r.policy_name.as_deref(),
            current_phase: &r.current_phase,
            age_days: r.age_days,
            issues: &r.issues,
        })
        .collect();
    let count = indices.len();

    let document = IssuesExport {
        generated_at: Utc::now(),
        total_indices_with_issues: count,
        indices,
    };

    write_json(&document, path)?;
    log::info!("Exported {} indices with issues to {}", count, path.display());
    Ok(count)
}

fn write_json<T: Serialize>(document: &T, path: &Path) -> Result<()> {
    let content = serde_json::to_string_pretty(document)?;
    fs::write(path, content)?;
    Ok(())
}
