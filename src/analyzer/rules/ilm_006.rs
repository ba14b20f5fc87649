//! ILM-006: Index is younger than the min_age of its current phase.

use super::{IndexRule, IndexRuleContext, codes};
use crate::analyzer::config::IlmHealthConfig;
use crate::analyzer::types::{Issue, IssueKind, Severity, format_days};

/// Rule: Phase age mismatch.
pub struct PhaseAgeMismatchRule;

impl IndexRule for PhaseAgeMismatchRule {
    fn code(&self) -> &'static str {
        codes::PHASE_AGE_MISMATCH
    }

    fn description(&self) -> &'static str {
        "Index is younger than the min_age of its current phase"
    }

    fn default_severity(&self) -> Severity {
        Severity::Info
    }

    fn check(&self, ctx: &IndexRuleContext, _config: &IlmHealthConfig) -> Option<Issue> {
        let policy = ctx.policy?;
        let phase = ctx.state.phase()?;
        let age = ctx.state.age_days?;
        let expected = policy.phase(phase)?.min_age_days?;

        if expected <= 0.0 || age >= expected {
            return None;
        }

        Some(Issue::new(
            self.default_severity(),
            IssueKind::PhaseAgeMismatch,
            self.code(),
            format!(
                "Index in {} phase but only {} old (expected {}+); the policy may have changed after the transition.",
                phase,
                format_days(age),
                format_days(expected)
            ),
        ))
    }
}
