//! Joins index states with their policies.
//!
//! The reconciler is a pure mapping: one [`IndexReport`] per index state,
//! no filtering. Exclusion is the aggregator's job.

use super::config::IlmHealthConfig;
use super::parser::strip_rollover_suffix;
use super::rules::classify;
use super::types::{IndexReport, IndexState, PolicyModel};
use std::collections::BTreeMap;

/// Reconcile every index state against the policy set.
pub fn reconcile(
    policies: &BTreeMap<String, PolicyModel>,
    states: &BTreeMap<String, IndexState>,
    config: &IlmHealthConfig,
) -> Vec<IndexReport> {
    states
        .values()
        .map(|state| reconcile_index(state, policies, config))
        .collect()
}

/// Reconcile one index.
///
/// Retention is inherited from the resolved policy, and is `None` when the
/// policy is unresolved (dangling or unmanaged).
pub fn reconcile_index(
    state: &IndexState,
    policies: &BTreeMap<String, PolicyModel>,
    config: &IlmHealthConfig,
) -> IndexReport {
    let policy = state
        .policy_name
        .as_deref()
        .and_then(|name| policies.get(name));

    if let (Some(name), None) = (&state.policy_name, policy) {
        log::debug!(
            "Index '{}' references missing policy '{}'",
            state.index_name,
            name
        );
    }

    IndexReport {
        index_name: state.index_name.clone(),
        display_name: strip_rollover_suffix(&state.index_name),
        policy_name: state.policy_name.clone(),
        retention_days: policy.and_then(|p| p.retention_days),
        current_phase: state.current_phase.clone(),
        age_days: state.age_days,
        issues: classify(state, policy, config),
    }
}
