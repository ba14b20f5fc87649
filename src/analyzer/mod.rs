//! ILM Policy Health Analyzer
//!
//! Reconciles ILM policy definitions against the live lifecycle state of
//! indices from a cluster diagnostic bundle.
//!
//! # Pipeline
//!
//! 1. [`parser::build_policy_models`] normalizes policy documents.
//! 2. [`parser::build_index_states`] normalizes explain documents.
//! 3. [`reconciler::reconcile`] joins them by policy name and classifies
//!    each index with the [`rules`].
//! 4. [`aggregator::aggregate`] filters, groups and sorts the result.
//!
//! Nothing in this module performs I/O; documents are loaded by
//! [`crate::bundle`] before the analysis runs.
//!
//! # Example
//!
//! ```rust
//! use ilm_health::analyzer::{IlmHealthConfig, run};
//! use serde_json::json;
//! use std::collections::BTreeMap;
//!
//! let mut policies = BTreeMap::new();
//! policies.insert(
//!     "P".to_string(),
//!     json!({ "phases": { "hot": { "min_age": "0d" }, "delete": { "min_age": "30d" } } }),
//! );
//! let mut explain = BTreeMap::new();
//! explain.insert("I".to_string(), json!({ "policy": "P", "phase": "delete" }));
//!
//! let report = run(&policies, &explain, &IlmHealthConfig::default());
//! assert_eq!(report.reports[0].retention_days, Some(30.0));
//! ```
//!
//! # Rules
//!
//! Index rules (ILM-001 through ILM-009) run in order and all matching
//! rules fire:
//! - ILM-001: Dangling policy reference
//! - ILM-002: Stuck step
//! - ILM-003: Unbounded retention
//! - ILM-004: Stale in hot
//! - ILM-005 to ILM-009: previous step problems, phase/age mismatch,
//!   malformed documents, unmanaged indices
//!
//! Policy rules (ILM-101 through ILM-105) produce per-policy
//! recommendations.

/// Configuration for the analyzer.
pub mod config;

/// Core data types.
pub mod types;

/// Parsing of policy and explain documents.
pub mod parser;

/// Health rules (ILM-001 through ILM-105).
pub mod rules;

/// Index/policy join.
pub mod reconciler;

/// Filtering, grouping and summaries.
pub mod aggregator;

/// Output formatting (table, JSON, summary) and export.
pub mod formatter;

use serde_json::Value;
use std::collections::BTreeMap;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::IlmHealthConfig;
pub use types::{
    HealthRating, HealthScore, IndexReport, IndexState, Issue, IssueKind, Phase, PhaseDefinition,
    PolicyModel, PolicySummary, Recommendation, Report, Retention, RuleCode, Severity,
};

pub use aggregator::{aggregate, is_noisy_phase};
pub use formatter::{
    OutputFormat, ReportView, export_issues, export_report, format_report,
    format_report_to_string,
};
pub use parser::{build_index_states, build_policy_models, parse_duration_days};
pub use reconciler::reconcile;
pub use rules::{classify, classify_policy, codes as rule_codes, rule_description};

/// Run the full reconciliation over already-loaded documents.
///
/// Never fails: malformed entities are reported as issues.
pub fn run(
    policies: &BTreeMap<String, Value>,
    explain: &BTreeMap<String, Value>,
    config: &IlmHealthConfig,
) -> Report {
    log::info!(
        "Reconciling {} policies against {} indices",
        policies.len(),
        explain.len()
    );
    if let Err(reason) = config.validate() {
        log::warn!("{}; using defaults for unusable thresholds", reason);
    }

    let models = build_policy_models(policies);
    let states = build_index_states(explain);
    let reports = reconcile(&models, &states, config);
    let report = aggregate(reports, &models, &states, config);

    log::info!(
        "Reconciliation complete: {} indices reported, {} issues, health {:.1}%",
        report.reports.len(),
        report.issue_count(),
        report.health.score
    );

    report
}
