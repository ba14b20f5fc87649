//! ILM-102: Data stays in the hot phase for a long time.

use super::{PolicyRule, PolicyRuleContext, codes};
use crate::analyzer::config::IlmHealthConfig;
use crate::analyzer::types::{Issue, IssueKind, Phase, Severity, format_days};

/// Rule: Long hot phase.
pub struct LongHotPhaseRule;

impl PolicyRule for LongHotPhaseRule {
    fn code(&self) -> &'static str {
        codes::LONG_HOT_PHASE
    }

    fn description(&self) -> &'static str {
        "Data stays in the hot phase for a long time"
    }

    fn default_severity(&self) -> Severity {
        Severity::Info
    }

    fn check(&self, ctx: &PolicyRuleContext, config: &IlmHealthConfig) -> Option<Issue> {
        let warm_after = ctx.policy.phase(Phase::Warm)?.min_age_days?;
        if warm_after <= config.long_hot_phase_days {
            return None;
        }

        Some(Issue::new(
            self.default_severity(),
            IssueKind::LongHotPhase,
            self.code(),
            format!(
                "Hot phase too long ({}); consider moving data to warm sooner.",
                format_days(warm_after)
            ),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::parser::build_policy_model;
    use serde_json::json;
    use std::collections::BTreeMap;

    #[test]
    fn test_warm_after_threshold() {
        let states = BTreeMap::new();
        let config = IlmHealthConfig::default();

        let policy = build_policy_model("p", &json!({ "phases": { "warm": { "min_age": "45d" } } }));
        let ctx = PolicyRuleContext { policy: &policy, states: &states };
        let issue = LongHotPhaseRule.check(&ctx, &config).unwrap();
        assert!(issue.message.contains("45d"));

        let policy = build_policy_model("p", &json!({ "phases": { "warm": { "min_age": "30d" } } }));
        let ctx = PolicyRuleContext { policy: &policy, states: &states };
        assert!(LongHotPhaseRule.check(&ctx, &config).is_none());
    }
}
