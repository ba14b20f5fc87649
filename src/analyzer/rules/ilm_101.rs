//! ILM-101: Policy moves from hot to cold without a warm phase.

use super::{PolicyRule, PolicyRuleContext, codes};
use crate::analyzer::config::IlmHealthConfig;
use crate::analyzer::types::{Issue, IssueKind, Phase, Severity};

/// Rule: Missing warm phase.
pub struct MissingWarmPhaseRule;

impl PolicyRule for MissingWarmPhaseRule {
    fn code(&self) -> &'static str {
        codes::MISSING_WARM_PHASE
    }

    fn description(&self) -> &'static str {
        "Policy moves from hot to cold without a warm phase"
    }

    fn default_severity(&self) -> Severity {
        Severity::Info
    }

    fn check(&self, ctx: &PolicyRuleContext, _config: &IlmHealthConfig) -> Option<Issue> {
        let policy = ctx.policy;
        if !policy.has_phase(Phase::Hot)
            || !policy.has_phase(Phase::Cold)
            || policy.has_phase(Phase::Warm)
        {
            return None;
        }

        Some(Issue::new(
            self.default_severity(),
            IssueKind::MissingWarmPhase,
            self.code(),
            "Add a warm phase between hot and cold.",
        ))
    }
}
