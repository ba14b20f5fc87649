//! ILM-004: Index has stayed in the hot phase longer than expected.

use super::{IndexRule, IndexRuleContext, codes};
use crate::analyzer::config::IlmHealthConfig;
use crate::analyzer::types::{Issue, IssueKind, Phase, PolicyModel, Severity, format_days};

/// Rule: Stale in hot.
pub struct StaleInHotRule;

/// Age in days above which a hot index counts as stale.
///
/// The reference age is the hot phase's `min_age` when positive, otherwise
/// the first later phase with a positive `min_age` (when the index should
/// have left hot). The threshold is the reference times the configured
/// multiplier. Without any positive reference the fixed fallback applies.
pub fn stale_threshold_days(policy: Option<&PolicyModel>, config: &IlmHealthConfig) -> f64 {
    let reference = policy.and_then(|p| {
        p.phases
            .iter()
            .filter_map(|definition| definition.min_age_days)
            .find(|days| *days > 0.0)
    });

    match reference {
        Some(days) => days * config.effective_staleness_multiplier(),
        None => config.effective_stale_hot_fallback_days(),
    }
}

impl IndexRule for StaleInHotRule {
    fn code(&self) -> &'static str {
        codes::STALE_IN_HOT
    }

    fn description(&self) -> &'static str {
        "Index has stayed in the hot phase longer than expected"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, ctx: &IndexRuleContext, config: &IlmHealthConfig) -> Option<Issue> {
        if ctx.state.phase() != Some(Phase::Hot) {
            return None;
        }

        let age = ctx.state.age_days?;
        let threshold = stale_threshold_days(ctx.policy, config);
        if age <= threshold {
            return None;
        }

        Some(Issue::new(
            self.default_severity(),
            IssueKind::StaleInHot,
            self.code(),
            format!(
                "Index has remained in hot phase for {} (expected under {}); check rollover conditions.",
                format_days(age),
                format_days(threshold)
            ),
        ))
    }
}
