//! ILM-001: Index references a policy missing from the policy set.

use super::{IndexRule, IndexRuleContext, codes};
use crate::analyzer::config::IlmHealthConfig;
use crate::analyzer::types::{Issue, IssueKind, Severity};

/// Rule: Dangling policy reference.
pub struct DanglingPolicyRule;

impl IndexRule for DanglingPolicyRule {
    fn code(&self) -> &'static str {
        codes::DANGLING_POLICY
    }

    fn description(&self) -> &'static str {
        "Index references a policy missing from the policy set"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, ctx: &IndexRuleContext, _config: &IlmHealthConfig) -> Option<Issue> {
        if !ctx.is_dangling() {
            return None;
        }

        let policy_name = ctx.state.policy_name.as_deref().unwrap_or_default();

        Some(Issue::new(
            self.default_severity(),
            IssueKind::DanglingPolicy,
            self.code(),
            format!(
                "Referenced policy '{}' not found in policy set. Restore the policy or attach an existing one to this index.",
                policy_name
            ),
        ))
    }
}
