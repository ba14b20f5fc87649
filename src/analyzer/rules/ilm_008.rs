//! ILM-008: The index's explain entry could not be fully parsed.

use super::{IndexRule, IndexRuleContext, codes};
use crate::analyzer::config::IlmHealthConfig;
use crate::analyzer::types::{Issue, IssueKind, Severity};

/// Rule: Malformed index state.
pub struct MalformedIndexStateRule;

impl IndexRule for MalformedIndexStateRule {
    fn code(&self) -> &'static str {
        codes::MALFORMED_INDEX_STATE
    }

    fn description(&self) -> &'static str {
        "The index's explain entry could not be fully parsed"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, ctx: &IndexRuleContext, _config: &IlmHealthConfig) -> Option<Issue> {
        if ctx.state.parse_errors.is_empty() {
            return None;
        }

        let errors: Vec<String> = ctx
            .state
            .parse_errors
            .iter()
            .map(|e| e.to_string())
            .collect();

        Some(Issue::new(
            self.default_severity(),
            IssueKind::MalformedIndexState,
            self.code(),
            format!(
                "Explain entry could not be fully parsed ({}); lifecycle checks for this index are incomplete.",
                errors.join("; ")
            ),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::parser::build_index_state;
    use serde_json::json;

    #[test]
    fn test_surfaces_bad_age() {
        let state = build_index_state("i", &json!({ "policy": "p", "age": "a while" }));
        let ctx = IndexRuleContext { state: &state, policy: None };
        let issue = MalformedIndexStateRule
            .check(&ctx, &IlmHealthConfig::default())
            .unwrap();
        assert!(issue.message.contains("a while"));
    }
}
