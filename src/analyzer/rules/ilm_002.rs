//! ILM-002: Index is stuck on a failed lifecycle step.

use super::{IndexRule, IndexRuleContext, codes, or_unknown, payload_reason};
use crate::analyzer::config::IlmHealthConfig;
use crate::analyzer::types::{Issue, IssueKind, Severity};

/// Step name the cluster reports for an index whose step failed.
const ERROR_STEP: &str = "ERROR";

/// Rule: Stuck step.
pub struct StuckStepRule;

impl IndexRule for StuckStepRule {
    fn code(&self) -> &'static str {
        codes::STUCK_STEP
    }

    fn description(&self) -> &'static str {
        "Index is stuck on a failed lifecycle step"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, ctx: &IndexRuleContext, _config: &IlmHealthConfig) -> Option<Issue> {
        let state = ctx.state;
        if state.step_info.is_none() && !state.step.eq_ignore_ascii_case(ERROR_STEP) {
            return None;
        }

        // When the step is ERROR the interesting name is the failed one
        let step = state
            .failed_step
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(&state.step);

        let reason = state
            .step_info
            .as_ref()
            .and_then(payload_reason)
            .map(|r| format!(" ({})", r))
            .unwrap_or_default();

        Some(Issue::new(
            self.default_severity(),
            IssueKind::StuckStep,
            self.code(),
            format!(
                "Index is stuck at step '{}' of action '{}' in phase '{}'{}. Manual intervention required: fix the cause, then retry with POST /{}/_ilm/retry.",
                or_unknown(step),
                or_unknown(&state.action),
                or_unknown(&state.current_phase),
                reason,
                state.index_name
            ),
        ))
    }
}
