//! ILM-007: The index's policy could not be fully parsed.

use super::{IndexRule, IndexRuleContext, codes};
use crate::analyzer::config::IlmHealthConfig;
use crate::analyzer::types::{Issue, IssueKind, Severity};

/// Rule: Malformed policy (index view).
pub struct MalformedPolicyRule;

impl IndexRule for MalformedPolicyRule {
    fn code(&self) -> &'static str {
        codes::MALFORMED_POLICY
    }

    fn description(&self) -> &'static str {
        "The index's policy could not be fully parsed"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, ctx: &IndexRuleContext, _config: &IlmHealthConfig) -> Option<Issue> {
        let policy = ctx.policy.filter(|p| p.is_malformed())?;

        let errors: Vec<String> = policy.parse_errors.iter().map(|e| e.to_string()).collect();

        Some(Issue::new(
            self.default_severity(),
            IssueKind::MalformedPolicy,
            self.code(),
            format!(
                "Policy '{}' could not be fully parsed ({}); retention for this index is unknown. Fix the policy definition.",
                policy.name,
                errors.join("; ")
            ),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::parser::{build_index_state, build_policy_model};
    use serde_json::json;

    #[test]
    fn test_surfaces_policy_parse_errors() {
        let policy = build_policy_model(
            "broken",
            &json!({ "phases": { "delete": { "min_age": "30 fortnights" } } }),
        );
        let state = build_index_state("i", &json!({ "policy": "broken", "phase": "hot" }));
        let ctx = IndexRuleContext { state: &state, policy: Some(&policy) };

        let issue = MalformedPolicyRule
            .check(&ctx, &IlmHealthConfig::default())
            .unwrap();
        assert_eq!(issue.kind, IssueKind::MalformedPolicy);
        assert!(issue.message.contains("30 fortnights"));
    }
}
