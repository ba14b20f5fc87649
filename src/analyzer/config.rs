//! Configuration for ILM health analysis.

use super::types::Severity;
use serde::{Deserialize, Serialize};

/// Policy names skipped unless `include_system` is set.
pub const DEFAULT_SYSTEM_POLICY_PATTERNS: &[&str] =
    &["metrics", "elastic-agent-ilm", "kibana-event-log-policy"];

/// Index names skipped unless `include_system` is set.
pub const DEFAULT_SYSTEM_INDEX_PATTERNS: &[&str] = &["partial-restored", ".internal"];

pub const DEFAULT_STALENESS_MULTIPLIER: f64 = 2.0;
pub const DEFAULT_STALE_HOT_FALLBACK_DAYS: f64 = 30.0;

/// Options for a reconciliation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IlmHealthConfig {
    /// Keep only indices past the rollover phases (policies-only view)
    pub exclude_noisy_phases: bool,

    /// Multiplier applied to the expected hot-phase age (default: 2)
    pub staleness_multiplier: f64,

    /// Hot-phase age limit when the policy gives no positive reference age (default: 30)
    pub stale_hot_fallback_days: f64,

    /// Include system policies and internal indices (default: true)
    pub include_system: bool,

    /// Substring patterns identifying system policies
    pub system_policy_patterns: Vec<String>,

    /// Substring patterns identifying internal indices
    pub system_index_patterns: Vec<String>,

    /// Report indices not managed by ILM
    pub report_unmanaged: bool,

    /// Minimum severity to report (default: Info)
    pub min_severity: Severity,

    /// Rules to ignore (by rule code)
    pub ignore_rules: Vec<String>,

    /// Retention above which a frozen phase is suggested (default: 365)
    pub long_retention_days: f64,

    /// Warm `min_age` above which the hot phase counts as long (default: 30)
    pub long_hot_phase_days: f64,
}

impl Default for IlmHealthConfig {
    fn default() -> Self {
        Self {
            exclude_noisy_phases: false,
            staleness_multiplier: DEFAULT_STALENESS_MULTIPLIER,
            stale_hot_fallback_days: DEFAULT_STALE_HOT_FALLBACK_DAYS,
            include_system: true,
            system_policy_patterns: DEFAULT_SYSTEM_POLICY_PATTERNS
                .iter()
                .map(|p| p.to_string())
                .collect(),
            system_index_patterns: DEFAULT_SYSTEM_INDEX_PATTERNS
                .iter()
                .map(|p| p.to_string())
                .collect(),
            report_unmanaged: false,
            min_severity: Severity::Info,
            ignore_rules: Vec::new(),
            long_retention_days: 365.0,
            long_hot_phase_days: 30.0,
        }
    }
}

impl IlmHealthConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop indices still in rollover phases from the output.
    pub fn with_exclude_noisy_phases(mut self, exclude: bool) -> Self {
        self.exclude_noisy_phases = exclude;
        self
    }

    pub fn with_staleness_multiplier(mut self, multiplier: f64) -> Self {
        self.staleness_multiplier = multiplier;
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.min_severity = severity;
        self
    }

    /// Include system policies and internal indices.
    pub fn with_system(mut self) -> Self {
        self.include_system = true;
        self
    }

    /// Hide system policies and internal indices from the report.
    pub fn hide_system(mut self) -> Self {
        self.include_system = false;
        self
    }

    pub fn with_unmanaged(mut self) -> Self {
        self.report_unmanaged = true;
        self
    }

    pub fn ignore_rule(mut self, rule: impl Into<String>) -> Self {
        self.ignore_rules.push(rule.into());
        self
    }

    /// Check that the numeric thresholds are usable.
    pub fn validate(&self) -> Result<(), String> {
        if !is_positive(self.staleness_multiplier) {
            return Err(format!(
                "staleness_multiplier must be a positive number, got {}",
                self.staleness_multiplier
            ));
        }
        if !is_positive(self.stale_hot_fallback_days) {
            return Err(format!(
                "stale_hot_fallback_days must be a positive number, got {}",
                self.stale_hot_fallback_days
            ));
        }
        for (name, value) in [
            ("long_retention_days", self.long_retention_days),
            ("long_hot_phase_days", self.long_hot_phase_days),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{} must be a non-negative number, got {}", name, value));
            }
        }
        Ok(())
    }

    /// Staleness multiplier, or the default when the configured one is unusable.
    pub fn effective_staleness_multiplier(&self) -> f64 {
        if is_positive(self.staleness_multiplier) {
            self.staleness_multiplier
        } else {
            DEFAULT_STALENESS_MULTIPLIER
        }
    }

    /// Fallback hot-phase limit, or the default when the configured one is unusable.
    pub fn effective_stale_hot_fallback_days(&self) -> f64 {
        if is_positive(self.stale_hot_fallback_days) {
            self.stale_hot_fallback_days
        } else {
            DEFAULT_STALE_HOT_FALLBACK_DAYS
        }
    }

    pub fn should_ignore_rule(&self, rule: &str) -> bool {
        self.ignore_rules.iter().any(|r| r == rule)
    }

    /// Check if a policy name belongs to a built-in/system policy.
    ///
    /// Names containing `logs` are system policies unless they contain
    /// `logs-`, which user data-stream policies do.
    pub fn is_system_policy(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        if self
            .system_policy_patterns
            .iter()
            .any(|p| name.contains(&p.to_lowercase()))
        {
            return true;
        }
        !self.system_policy_patterns.is_empty() && name.contains("logs") && !name.contains("logs-")
    }

    pub fn is_system_index(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.system_index_patterns
            .iter()
            .any(|p| name.contains(&p.to_lowercase()))
    }

    /// Whether the aggregator should hide this policy.
    pub fn should_exclude_policy(&self, name: &str) -> bool {
        !self.include_system && self.is_system_policy(name)
    }

    /// Whether the aggregator should hide this index.
    pub fn should_exclude_index(&self, name: &str) -> bool {
        !self.include_system && self.is_system_index(name)
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}
