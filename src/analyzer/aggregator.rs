//! Report aggregation.
//!
//! Filters index reports, groups them by policy and computes per-policy
//! summaries. Output order depends only on names, never on input order.

use super::config::IlmHealthConfig;
use super::rules::classify_policy;
use super::types::{
    HealthScore, IndexReport, IndexState, PHASE_NOT_APPLICABLE, PolicyModel, PolicySummary,
    Report, Retention,
};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Phases that roll over continuously and are noise for retention audits.
pub const NOISY_PHASES: &[&str] = &["hot", "warm", "cold", "frozen", "", PHASE_NOT_APPLICABLE];

/// Whether a phase is dropped when `exclude_noisy_phases` is set.
pub fn is_noisy_phase(phase: &str) -> bool {
    NOISY_PHASES.contains(&phase)
}

/// Aggregate index reports into the final report.
pub fn aggregate(
    reports: Vec<IndexReport>,
    policies: &BTreeMap<String, PolicyModel>,
    states: &BTreeMap<String, IndexState>,
    config: &IlmHealthConfig,
) -> Report {
    let total = reports.len();
    let mut reports: Vec<IndexReport> = reports
        .into_iter()
        .filter(|report| should_keep(report, config))
        .collect();
    reports.sort_by(compare_reports);

    log::debug!("Kept {} of {} index reports", reports.len(), total);

    let summaries = build_summaries(&reports, policies, states, config);
    let health = HealthScore::compute(&reports);

    Report {
        summaries,
        reports,
        health,
    }
}

fn should_keep(report: &IndexReport, config: &IlmHealthConfig) -> bool {
    if config.exclude_noisy_phases && is_noisy_phase(&report.current_phase) {
        return false;
    }
    if config.should_exclude_index(&report.index_name) {
        return false;
    }
    match &report.policy_name {
        Some(policy) => !config.should_exclude_policy(policy),
        None => true,
    }
}

/// Policy name ascending with unmanaged indices last, then index name.
fn compare_reports(a: &IndexReport, b: &IndexReport) -> Ordering {
    let policy_key = |r: &IndexReport| (r.policy_name.is_none(), r.policy_name.clone());
    policy_key(a)
        .cmp(&policy_key(b))
        .then_with(|| a.index_name.cmp(&b.index_name))
}

fn build_summaries(
    reports: &[IndexReport],
    policies: &BTreeMap<String, PolicyModel>,
    states: &BTreeMap<String, IndexState>,
    config: &IlmHealthConfig,
) -> Vec<PolicySummary> {
    let mut summaries: BTreeMap<String, PolicySummary> = policies
        .values()
        .filter(|policy| !config.should_exclude_policy(&policy.name))
        .map(|policy| {
            (
                policy.name.clone(),
                summary_for_policy(policy, states, config),
            )
        })
        .collect();

    let mut ages: BTreeMap<String, Vec<f64>> = BTreeMap::new();

    for report in reports {
        let Some(policy_name) = &report.policy_name else {
            continue;
        };

        let summary = summaries
            .entry(policy_name.clone())
            .or_insert_with(|| dangling_summary(policy_name));

        summary.index_count += 1;
        summary.issue_count += report.issues.len();
        *summary
            .phase_counts
            .entry(report.current_phase.clone())
            .or_insert(0) += 1;

        if let Some(age) = report.age_days {
            ages.entry(policy_name.clone()).or_default().push(age);
        }
    }

    for (policy_name, values) in ages {
        if let Some(summary) = summaries.get_mut(&policy_name) {
            summary.min_age_days = values.iter().copied().reduce(f64::min);
            summary.max_age_days = values.iter().copied().reduce(f64::max);
            summary.avg_age_days = Some(values.iter().sum::<f64>() / values.len() as f64);
        }
    }

    summaries.into_values().collect()
}

fn summary_for_policy(
    policy: &PolicyModel,
    states: &BTreeMap<String, IndexState>,
    config: &IlmHealthConfig,
) -> PolicySummary {
    PolicySummary {
        policy_name: policy.name.clone(),
        resolved: true,
        retention: policy.retention(),
        retention_days: policy.retention_days,
        lifecycle: policy.lifecycle_summary(),
        last_modified: policy.last_modified,
        index_count: 0,
        issue_count: 0,
        min_age_days: None,
        max_age_days: None,
        avg_age_days: None,
        phase_counts: BTreeMap::new(),
        policy_issues: classify_policy(policy, states, config),
    }
}

fn dangling_summary(policy_name: &str) -> PolicySummary {
    PolicySummary {
        policy_name: policy_name.to_string(),
        resolved: false,
        retention: Retention::Unknown,
        retention_days: None,
        lifecycle: String::new(),
        last_modified: None,
        index_count: 0,
        issue_count: 0,
        min_age_days: None,
        max_age_days: None,
        avg_age_days: None,
        phase_counts: BTreeMap::new(),
        policy_issues: Vec::new(),
    }
}
