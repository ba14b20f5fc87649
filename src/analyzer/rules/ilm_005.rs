//! ILM-005: The previous lifecycle step reported a problem.

use super::{IndexRule, IndexRuleContext, codes, payload_reason};
use crate::analyzer::config::IlmHealthConfig;
use crate::analyzer::types::{Issue, IssueKind, Severity};

/// Rule: Previous step failed.
pub struct PreviousStepFailedRule;

impl IndexRule for PreviousStepFailedRule {
    fn code(&self) -> &'static str {
        codes::PREVIOUS_STEP_FAILED
    }

    fn description(&self) -> &'static str {
        "The previous lifecycle step reported a problem"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, ctx: &IndexRuleContext, _config: &IlmHealthConfig) -> Option<Issue> {
        let payload = ctx.state.previous_step_info.as_ref()?;
        let detail = payload_reason(payload)?;

        Some(Issue::new(
            self.default_severity(),
            IssueKind::PreviousStepFailed,
            self.code(),
            format!(
                "Previous step issue: {}. Verify the index has progressed past it.",
                detail
            ),
        ))
    }
}
