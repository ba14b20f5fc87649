//! ILM-009: Index is not managed by ILM.

use super::{IndexRule, IndexRuleContext, codes};
use crate::analyzer::config::IlmHealthConfig;
use crate::analyzer::types::{Issue, IssueKind, Severity};

/// Rule: Unmanaged index. Only reported when enabled in the config.
pub struct UnmanagedRule;

impl IndexRule for UnmanagedRule {
    fn code(&self) -> &'static str {
        codes::UNMANAGED
    }

    fn description(&self) -> &'static str {
        "Index is not managed by ILM"
    }

    fn default_severity(&self) -> Severity {
        Severity::Info
    }

    fn check(&self, ctx: &IndexRuleContext, config: &IlmHealthConfig) -> Option<Issue> {
        if !config.report_unmanaged || ctx.state.policy_name.is_some() {
            return None;
        }

        Some(Issue::new(
            self.default_severity(),
            IssueKind::Unmanaged,
            self.code(),
            "Index is not managed by ILM; attach a lifecycle policy if its data should expire.",
        ))
    }
}
