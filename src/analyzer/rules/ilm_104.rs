//! ILM-104: Policy definition could not be fully parsed.

use super::{PolicyRule, PolicyRuleContext, codes};
use crate::analyzer::config::IlmHealthConfig;
use crate::analyzer::types::{Issue, IssueKind, Severity};

/// Rule: Policy parse errors (policy view).
pub struct PolicyParseErrorsRule;

impl PolicyRule for PolicyParseErrorsRule {
    fn code(&self) -> &'static str {
        codes::POLICY_PARSE_ERRORS
    }

    fn description(&self) -> &'static str {
        "Policy definition could not be fully parsed"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, ctx: &PolicyRuleContext, _config: &IlmHealthConfig) -> Option<Issue> {
        if !ctx.policy.is_malformed() {
            return None;
        }

        let errors: Vec<String> = ctx
            .policy
            .parse_errors
            .iter()
            .map(|e| e.to_string())
            .collect();

        Some(Issue::new(
            self.default_severity(),
            IssueKind::MalformedPolicy,
            self.code(),
            format!(
                "Policy could not be fully parsed ({}); retention is unknown.",
                errors.join("; ")
            ),
        ))
    }
}
