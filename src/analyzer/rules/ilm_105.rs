//! ILM-105: Policy lists indices that have no explain entry.

use super::{PolicyRule, PolicyRuleContext, codes};
use crate::analyzer::config::IlmHealthConfig;
use crate::analyzer::types::{Issue, IssueKind, Severity};

/// Number of index names quoted in the message.
const PREVIEW_LIMIT: usize = 5;

/// Rule: Missing explain data.
pub struct MissingExplainRule;

impl PolicyRule for MissingExplainRule {
    fn code(&self) -> &'static str {
        codes::MISSING_EXPLAIN
    }

    fn description(&self) -> &'static str {
        "Policy lists indices that have no explain entry"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, ctx: &PolicyRuleContext, config: &IlmHealthConfig) -> Option<Issue> {
        let missing: Vec<&str> = ctx
            .policy
            .in_use_by
            .iter()
            .filter(|index| !config.should_exclude_index(index))
            .filter(|index| !ctx.states.contains_key(index.as_str()))
            .map(String::as_str)
            .collect();

        if missing.is_empty() {
            return None;
        }

        let mut preview = missing
            .iter()
            .take(PREVIEW_LIMIT)
            .copied()
            .collect::<Vec<_>>()
            .join(", ");
        if missing.len() > PREVIEW_LIMIT {
            preview.push_str(", ...");
        }

        Some(Issue::new(
            self.default_severity(),
            IssueKind::MissingExplain,
            self.code(),
            format!(
                "{} index(es) use this policy but have no explain data: {}. Re-collect the bundle or check that the indices still exist.",
                missing.len(),
                preview
            ),
        ))
    }
}
