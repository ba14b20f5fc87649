//! Health rules for indices and policies.
//!
//! Each rule is implemented as a separate module with a consistent interface.
//! Rules are identified by codes like ILM-001; index rules run in registry
//! order and every matching rule fires.

mod ilm_001;
mod ilm_002;
mod ilm_003;
mod ilm_004;
mod ilm_005;
mod ilm_006;
mod ilm_007;
mod ilm_008;
mod ilm_009;
mod ilm_101;
mod ilm_102;
mod ilm_103;
mod ilm_104;
mod ilm_105;

use crate::analyzer::config::IlmHealthConfig;
use crate::analyzer::types::{IndexState, Issue, PolicyModel, Severity};
use serde_json::Value;
use std::collections::BTreeMap;

// ============================================================================
// Rule Traits
// ============================================================================

/// A check over one index and its resolved policy.
pub trait IndexRule: Send + Sync {
    /// Get the rule code (e.g., "ILM-001").
    fn code(&self) -> &'static str;

    fn description(&self) -> &'static str;

    fn default_severity(&self) -> Severity;

    /// Return an issue if the rule matches.
    fn check(&self, ctx: &IndexRuleContext, config: &IlmHealthConfig) -> Option<Issue>;
}

/// Context for index rule evaluation.
pub struct IndexRuleContext<'a> {
    pub state: &'a IndexState,
    /// `None` when the index is unmanaged or its policy is missing
    pub policy: Option<&'a PolicyModel>,
}

impl IndexRuleContext<'_> {
    /// The index names a policy that is not in the policy set.
    pub fn is_dangling(&self) -> bool {
        self.state.policy_name.is_some() && self.policy.is_none()
    }
}

/// A check over one policy definition.
pub trait PolicyRule: Send + Sync {
    fn code(&self) -> &'static str;

    fn description(&self) -> &'static str;

    fn default_severity(&self) -> Severity;

    fn check(&self, ctx: &PolicyRuleContext, config: &IlmHealthConfig) -> Option<Issue>;
}

/// Context for policy rule evaluation.
pub struct PolicyRuleContext<'a> {
    pub policy: &'a PolicyModel,
    /// Every index state in the run, keyed by index name
    pub states: &'a BTreeMap<String, IndexState>,
}

// ============================================================================
// Rule Codes
// ============================================================================

/// Rule code constants.
pub mod codes {
    pub const DANGLING_POLICY: &str = "ILM-001";
    pub const STUCK_STEP: &str = "ILM-002";
    pub const UNBOUNDED_RETENTION: &str = "ILM-003";
    pub const STALE_IN_HOT: &str = "ILM-004";
    pub const PREVIOUS_STEP_FAILED: &str = "ILM-005";
    pub const PHASE_AGE_MISMATCH: &str = "ILM-006";
    pub const MALFORMED_POLICY: &str = "ILM-007";
    pub const MALFORMED_INDEX_STATE: &str = "ILM-008";
    pub const UNMANAGED: &str = "ILM-009";

    pub const MISSING_WARM_PHASE: &str = "ILM-101";
    pub const LONG_HOT_PHASE: &str = "ILM-102";
    pub const NO_FROZEN_FOR_LONG_RETENTION: &str = "ILM-103";
    pub const POLICY_PARSE_ERRORS: &str = "ILM-104";
    pub const MISSING_EXPLAIN: &str = "ILM-105";

    /// Rules that always run, whatever `ignore_rules` says.
    pub const MANDATORY: &[&str] = &[DANGLING_POLICY];
}

// ============================================================================
// Rule Registry
// ============================================================================

/// All index rules, in evaluation order.
pub fn index_rules() -> Vec<Box<dyn IndexRule>> {
    vec![
        Box::new(ilm_001::DanglingPolicyRule),
        Box::new(ilm_002::StuckStepRule),
        Box::new(ilm_003::UnboundedRetentionRule),
        Box::new(ilm_004::StaleInHotRule),
        Box::new(ilm_005::PreviousStepFailedRule),
        Box::new(ilm_006::PhaseAgeMismatchRule),
        Box::new(ilm_007::MalformedPolicyRule),
        Box::new(ilm_008::MalformedIndexStateRule),
        Box::new(ilm_009::UnmanagedRule),
    ]
}

/// All policy rules, in evaluation order.
pub fn policy_rules() -> Vec<Box<dyn PolicyRule>> {
    vec![
        Box::new(ilm_101::MissingWarmPhaseRule),
        Box::new(ilm_102::LongHotPhaseRule),
        Box::new(ilm_103::NoFrozenForLongRetentionRule),
        Box::new(ilm_104::PolicyParseErrorsRule),
        Box::new(ilm_105::MissingExplainRule),
    ]
}

/// Get rule description by code.
pub fn rule_description(code: &str) -> &'static str {
    index_rules()
        .iter()
        .find(|r| r.code() == code)
        .map(|r| r.description())
        .or_else(|| {
            policy_rules()
                .iter()
                .find(|r| r.code() == code)
                .map(|r| r.description())
        })
        .unwrap_or("Unknown rule")
}

// ============================================================================
// Classification
// ============================================================================

/// Classify one index against its resolved policy.
///
/// Deterministic and side-effect free: the same inputs always yield the
/// same issues in the same order.
pub fn classify(
    state: &IndexState,
    policy: Option<&PolicyModel>,
    config: &IlmHealthConfig,
) -> Vec<Issue> {
    let ctx = IndexRuleContext { state, policy };

    index_rules()
        .iter()
        .filter(|rule| !is_ignored(rule.code(), config))
        .filter_map(|rule| rule.check(&ctx, config))
        .filter(|issue| issue.severity >= config.min_severity)
        .collect()
}

/// Classify a policy definition.
pub fn classify_policy(
    policy: &PolicyModel,
    states: &BTreeMap<String, IndexState>,
    config: &IlmHealthConfig,
) -> Vec<Issue> {
    let ctx = PolicyRuleContext { policy, states };

    policy_rules()
        .iter()
        .filter(|rule| !is_ignored(rule.code(), config))
        .filter_map(|rule| rule.check(&ctx, config))
        .filter(|issue| issue.severity >= config.min_severity)
        .collect()
}

/// Mandatory rules cannot be ignored; an unresolved policy reference is
/// always reported.
fn is_ignored(code: &str, config: &IlmHealthConfig) -> bool {
    !codes::MANDATORY.contains(&code) && config.should_ignore_rule(code)
}

// ============================================================================
// Helpers shared by rules
// ============================================================================

/// Best human-readable reason in a step payload.
pub(crate) fn payload_reason(payload: &Value) -> Option<String> {
    ["reason", "message", "type"]
        .iter()
        .find_map(|key| payload.get(key).and_then(Value::as_str))
        .map(String::from)
        .or_else(|| payload.as_str().map(String::from))
}

pub(crate) fn or_unknown(value: &str) -> &str {
    if value.is_empty() { "<unknown>" } else { value }
}

// Re-export rule implementations for direct access
pub use ilm_001::DanglingPolicyRule;
pub use ilm_002::StuckStepRule;
pub use ilm_003::UnboundedRetentionRule;
pub use ilm_004::{StaleInHotRule, stale_threshold_days};
pub use ilm_005::PreviousStepFailedRule;
pub use ilm_006::PhaseAgeMismatchRule;
pub use ilm_007::MalformedPolicyRule;
pub use ilm_008::MalformedIndexStateRule;
pub use ilm_009::UnmanagedRule;
pub use ilm_101::MissingWarmPhaseRule;
pub use ilm_102::LongHotPhaseRule;
pub use ilm_103::NoFrozenForLongRetentionRule;
pub use ilm_104::PolicyParseErrorsRule;
pub use ilm_105::MissingExplainRule;
