//! ILM-103: Long retention without a frozen phase.

use super::{PolicyRule, PolicyRuleContext, codes};
use crate::analyzer::config::IlmHealthConfig;
use crate::analyzer::types::{Issue, IssueKind, Phase, Severity, format_days};

/// Rule: No frozen phase for long retention.
pub struct NoFrozenForLongRetentionRule;

impl PolicyRule for NoFrozenForLongRetentionRule {
    fn code(&self) -> &'static str {
        codes::NO_FROZEN_FOR_LONG_RETENTION
    }

    fn description(&self) -> &'static str {
        "Long retention without a frozen phase"
    }

    fn default_severity(&self) -> Severity {
        Severity::Info
    }

    fn check(&self, ctx: &PolicyRuleContext, config: &IlmHealthConfig) -> Option<Issue> {
        let retention = ctx.policy.retention_days?;
        if retention <= config.long_retention_days || ctx.policy.has_phase(Phase::Frozen) {
            return None;
        }

        Some(Issue::new(
            self.default_severity(),
            IssueKind::NoFrozenForLongRetention,
            self.code(),
            format!(
                "Use a frozen phase for {} retention to cut storage costs.",
                format_days(retention)
            ),
        ))
    }
}
