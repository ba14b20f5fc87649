//! ILM-003: Policy has no delete phase.

use super::{IndexRule, IndexRuleContext, codes};
use crate::analyzer::config::IlmHealthConfig;
use crate::analyzer::types::{Issue, IssueKind, Phase, Severity};

/// Rule: Unbounded retention.
pub struct UnboundedRetentionRule;

impl IndexRule for UnboundedRetentionRule {
    fn code(&self) -> &'static str {
        codes::UNBOUNDED_RETENTION
    }

    fn description(&self) -> &'static str {
        "Policy has no delete phase"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, ctx: &IndexRuleContext, _config: &IlmHealthConfig) -> Option<Issue> {
        let policy = ctx.policy?;

        // Unknown retention is reported by ILM-007, not as unbounded
        if policy.is_malformed() || policy.has_phase(Phase::Delete) {
            return None;
        }

        if ctx.state.is_not_applicable() {
            return None;
        }

        Some(Issue::new(
            self.default_severity(),
            IssueKind::UnboundedRetention,
            self.code(),
            format!(
                "Policy '{}' has no delete phase; index will retain data indefinitely. Confirm this is intentional.",
                policy.name
            ),
        ))
    }
}
