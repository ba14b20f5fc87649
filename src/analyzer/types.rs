//! Core types for ILM policy reconciliation.
//!
//! These types represent normalized policies, per-index lifecycle state,
//! the issues detected for them and the aggregated report handed to the
//! formatters.

use crate::error::ParseError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Phase value used for indices that are not managed by ILM.
pub const PHASE_NOT_APPLICABLE: &str = "n/a";

// ============================================================================
// Severity
// ============================================================================

/// Severity levels for lifecycle issues.
///
/// Ordered from least to most severe: `Info < Warning < Error`
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    /// Informational suggestions
    #[default]
    Info,
    /// Something that is probably unintended
    Warning,
    /// The lifecycle is broken for this entity
    Error,
}

impl Severity {
    /// Parse a severity from a string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "info" => Some(Self::Info),
            "warning" | "warn" => Some(Self::Warning),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl<'de> serde::Deserialize<'de> for Severity {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown severity '{}'", raw)))
    }
}

// ============================================================================
// Rule Codes
// ============================================================================

/// A rule code identifier (e.g. "ILM-001").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RuleCode(pub String);

impl RuleCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RuleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RuleCode {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

// ============================================================================
// Issue
// ============================================================================

/// Kind of lifecycle problem detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueKind {
    /// Index references a policy that is not in the policy set
    DanglingPolicy,
    /// Index is stuck on a failed step
    StuckStep,
    /// Policy has no delete phase
    UnboundedRetention,
    /// Index has stayed in the hot phase too long
    StaleInHot,
    /// The previous step reported a problem
    PreviousStepFailed,
    /// Index is younger than its current phase's min_age
    PhaseAgeMismatch,
    /// The policy document could not be fully parsed
    MalformedPolicy,
    /// The explain document for the index could not be fully parsed
    MalformedIndexState,
    /// Index is not managed by ILM
    Unmanaged,
    /// Policy goes from hot to cold without a warm phase
    MissingWarmPhase,
    /// Data stays in hot for a long time before warm
    LongHotPhase,
    /// Long retention without a frozen phase
    NoFrozenForLongRetention,
    /// Policy lists indices that have no explain entry
    MissingExplain,
}

impl IssueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DanglingPolicy => "DANGLING_POLICY",
            Self::StuckStep => "STUCK_STEP",
            Self::UnboundedRetention => "UNBOUNDED_RETENTION",
            Self::StaleInHot => "STALE_IN_HOT",
            Self::PreviousStepFailed => "PREVIOUS_STEP_FAILED",
            Self::PhaseAgeMismatch => "PHASE_AGE_MISMATCH",
            Self::MalformedPolicy => "MALFORMED_POLICY",
            Self::MalformedIndexState => "MALFORMED_INDEX_STATE",
            Self::Unmanaged => "UNMANAGED",
            Self::MissingWarmPhase => "MISSING_WARM_PHASE",
            Self::LongHotPhase => "LONG_HOT_PHASE",
            Self::NoFrozenForLongRetention => "NO_FROZEN_FOR_LONG_RETENTION",
            Self::MissingExplain => "MISSING_EXPLAIN",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single finding with its recommendation text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Issue {
    pub severity: Severity,
    pub kind: IssueKind,
    pub rule_code: RuleCode,
    /// Human-readable recommendation
    pub message: String,
}

impl Issue {
    pub fn new(
        severity: Severity,
        kind: IssueKind,
        rule_code: impl Into<RuleCode>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            kind,
            rule_code: rule_code.into(),
            message: message.into(),
        }
    }
}

// ============================================================================
// Phases
// ============================================================================

/// A lifecycle phase. `Ord` follows the lifecycle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Hot,
    Warm,
    Cold,
    Frozen,
    Delete,
}

impl Phase {
    /// All phases in lifecycle order.
    pub const ALL: [Phase; 5] = [
        Phase::Hot,
        Phase::Warm,
        Phase::Cold,
        Phase::Frozen,
        Phase::Delete,
    ];

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "hot" => Some(Self::Hot),
            "warm" => Some(Self::Warm),
            "cold" => Some(Self::Cold),
            "frozen" => Some(Self::Frozen),
            "delete" => Some(Self::Delete),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hot => "hot",
            Self::Warm => "warm",
            Self::Cold => "cold",
            Self::Frozen => "frozen",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One phase of a policy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhaseDefinition {
    pub phase: Phase,
    /// The raw `min_age` value as written in the policy
    pub min_age: String,
    /// `min_age` in days, `None` if it could not be parsed
    pub min_age_days: Option<f64>,
    pub actions: BTreeSet<String>,
}

// ============================================================================
// Policy Model
// ============================================================================

/// Effective retention of a policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "days", rename_all = "snake_case")]
pub enum Retention {
    /// Indices are deleted after this many days
    Days(f64),
    /// No delete phase: data is kept indefinitely
    Unbounded,
    /// The policy could not be parsed well enough to tell
    Unknown,
}

impl fmt::Display for Retention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Days(days) => write!(f, "{}", format_days(*days)),
            Self::Unbounded => write!(f, "∞"),
            Self::Unknown => write!(f, "?"),
        }
    }
}

/// A normalized ILM policy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolicyModel {
    pub name: String,
    /// Phases present in the policy, in lifecycle order
    pub phases: Vec<PhaseDefinition>,
    /// `min_age` of the delete phase; `None` when unbounded or unknown
    pub retention_days: Option<f64>,
    pub last_modified: Option<DateTime<Utc>>,
    /// Indices the bundle reports as using this policy
    pub in_use_by: Vec<String>,
    /// Problems found while building the model
    pub parse_errors: Vec<ParseError>,
}

impl PolicyModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phases: Vec::new(),
            retention_days: None,
            last_modified: None,
            in_use_by: Vec::new(),
            parse_errors: Vec::new(),
        }
    }

    pub fn phase(&self, phase: Phase) -> Option<&PhaseDefinition> {
        self.phases.iter().find(|p| p.phase == phase)
    }

    pub fn has_phase(&self, phase: Phase) -> bool {
        self.phase(phase).is_some()
    }

    pub fn is_malformed(&self) -> bool {
        !self.parse_errors.is_empty()
    }

    /// Retention with "unbounded" and "unknown" kept apart.
    pub fn retention(&self) -> Retention {
        if self.is_malformed() {
            return Retention::Unknown;
        }
        match self.retention_days {
            Some(days) => Retention::Days(days),
            None if self.has_phase(Phase::Delete) => Retention::Unknown,
            None => Retention::Unbounded,
        }
    }

    /// Compact one-line description, e.g. `hot(0d: rollover) → delete(30d)`.
    pub fn lifecycle_summary(&self) -> String {
        self.phases
            .iter()
            .map(|p| {
                let age = match p.min_age_days {
                    Some(days) => format_days(days),
                    None => format!("{}?", p.min_age),
                };
                if p.actions.is_empty() {
                    format!("{}({})", p.phase, age)
                } else {
                    let actions: Vec<&str> = p.actions.iter().map(String::as_str).collect();
                    format!("{}({}: {})", p.phase, age, actions.join(","))
                }
            })
            .collect::<Vec<_>>()
            .join(" → ")
    }
}

// ============================================================================
// Index State
// ============================================================================

/// Runtime lifecycle state of one index, from the explain document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexState {
    pub index_name: String,
    /// `None` for unmanaged indices
    pub policy_name: Option<String>,
    pub managed: bool,
    /// Lowercased phase name, `""` when missing, `"n/a"` when unmanaged
    pub current_phase: String,
    pub action: String,
    pub step: String,
    /// The step that failed, when `step` is `ERROR`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_step: Option<String>,
    /// Error payload, present only when the index is stuck
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_info: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_step_info: Option<Value>,
    pub age_days: Option<f64>,
    pub parse_errors: Vec<ParseError>,
}

impl IndexState {
    /// A state with every optional field empty.
    pub fn unmanaged(index_name: impl Into<String>) -> Self {
        Self {
            index_name: index_name.into(),
            policy_name: None,
            managed: false,
            current_phase: PHASE_NOT_APPLICABLE.to_string(),
            action: String::new(),
            step: String::new(),
            failed_step: None,
            step_info: None,
            previous_step_info: None,
            age_days: None,
            parse_errors: Vec::new(),
        }
    }

    pub fn phase(&self) -> Option<Phase> {
        Phase::parse(&self.current_phase)
    }

    pub fn is_not_applicable(&self) -> bool {
        self.current_phase == PHASE_NOT_APPLICABLE
    }
}

// ============================================================================
// Index Report
// ============================================================================

/// One index joined with its resolved policy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexReport {
    pub index_name: String,
    /// Index name without the rollover date/generation suffix
    pub display_name: String,
    pub policy_name: Option<String>,
    pub retention_days: Option<f64>,
    pub current_phase: String,
    pub age_days: Option<f64>,
    pub issues: Vec<Issue>,
}

impl IndexReport {
    pub fn is_healthy(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn max_severity(&self) -> Option<Severity> {
        self.issues.iter().map(|i| i.severity).max()
    }

    pub fn has_errors(&self) -> bool {
        self.max_severity() == Some(Severity::Error)
    }

    pub fn has_issue(&self, kind: IssueKind) -> bool {
        self.issues.iter().any(|i| i.kind == kind)
    }

    /// Short status label for tables.
    pub fn status(&self) -> &'static str {
        match self.max_severity() {
            None => "healthy",
            Some(Severity::Info) => "info",
            Some(Severity::Warning) => "warning",
            Some(Severity::Error) => "error",
        }
    }
}

// ============================================================================
// Summaries and Report
// ============================================================================

/// Aggregated statistics for one policy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolicySummary {
    pub policy_name: String,
    /// `false` for names that only appear as dangling references
    pub resolved: bool,
    pub retention: Retention,
    pub retention_days: Option<f64>,
    pub lifecycle: String,
    pub last_modified: Option<DateTime<Utc>>,
    pub index_count: usize,
    /// Number of index-level issues across member indices
    pub issue_count: usize,
    pub min_age_days: Option<f64>,
    pub max_age_days: Option<f64>,
    pub avg_age_days: Option<f64>,
    pub phase_counts: BTreeMap<String, usize>,
    /// Findings about the policy itself
    pub policy_issues: Vec<Issue>,
}

impl PolicySummary {
    pub fn phase_count(&self, phase: &str) -> usize {
        self.phase_counts.get(phase).copied().unwrap_or(0)
    }
}

/// Overall rating derived from the health score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HealthRating {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl HealthRating {
    pub fn from_score(score: f64) -> Self {
        if score >= 95.0 {
            Self::Excellent
        } else if score >= 85.0 {
            Self::Good
        } else if score >= 70.0 {
            Self::Fair
        } else {
            Self::Poor
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excellent => "EXCELLENT",
            Self::Good => "GOOD",
            Self::Fair => "FAIR",
            Self::Poor => "POOR",
        }
    }
}

impl fmt::Display for HealthRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Share of policy-governed indices without ERROR issues.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthScore {
    pub score: f64,
    pub rating: HealthRating,
    /// Indices that reference a policy; unmanaged indices are not scored
    pub total_indices: usize,
    pub errored_indices: usize,
}

impl HealthScore {
    pub fn compute(reports: &[IndexReport]) -> Self {
        let scored: Vec<&IndexReport> = reports
            .iter()
            .filter(|r| r.policy_name.is_some())
            .collect();
        let total_indices = scored.len();
        let errored_indices = scored.iter().filter(|r| r.has_errors()).count();
        let score = if total_indices == 0 {
            0.0
        } else {
            (100.0 - errored_indices as f64 / total_indices as f64 * 100.0).max(0.0)
        };
        Self {
            score,
            rating: HealthRating::from_score(score),
            total_indices,
            errored_indices,
        }
    }
}

/// A recommendation line, grouped for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    /// Policy name, or index name for unmanaged indices
    pub subject: String,
    pub severity: Severity,
    pub kind: IssueKind,
    pub rule_code: RuleCode,
    /// Number of indices affected (0 for policy-level findings)
    pub affected_indices: usize,
    pub message: String,
}

/// Complete result of a reconciliation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    /// One entry per policy, sorted by name
    pub summaries: Vec<PolicySummary>,
    /// Sorted by policy name (unmanaged last), then index name
    pub reports: Vec<IndexReport>,
    pub health: HealthScore,
}

impl Report {
    pub fn report(&self, index_name: &str) -> Option<&IndexReport> {
        self.reports.iter().find(|r| r.index_name == index_name)
    }

    pub fn summary(&self, policy_name: &str) -> Option<&PolicySummary> {
        self.summaries.iter().find(|s| s.policy_name == policy_name)
    }

    pub fn issue_count(&self) -> usize {
        self.reports.iter().map(|r| r.issues.len()).sum::<usize>()
            + self
                .summaries
                .iter()
                .map(|s| s.policy_issues.len())
                .sum::<usize>()
    }

    /// Reports with at least one ERROR issue, oldest first.
    pub fn errored_reports(&self) -> Vec<&IndexReport> {
        let mut errored: Vec<&IndexReport> =
            self.reports.iter().filter(|r| r.has_errors()).collect();
        errored.sort_by(|a, b| {
            b.age_days
                .unwrap_or(0.0)
                .total_cmp(&a.age_days.unwrap_or(0.0))
                .then_with(|| a.index_name.cmp(&b.index_name))
        });
        errored
    }

    /// Policy-level findings followed by index findings (WARNING and
    /// above) grouped per policy and kind.
    pub fn recommendations(&self) -> Vec<Recommendation> {
        let mut recs: Vec<Recommendation> = Vec::new();

        for summary in &self.summaries {
            for issue in &summary.policy_issues {
                recs.push(Recommendation {
                    subject: summary.policy_name.clone(),
                    severity: issue.severity,
                    kind: issue.kind,
                    rule_code: issue.rule_code.clone(),
                    affected_indices: 0,
                    message: issue.message.clone(),
                });
            }
        }

        let mut grouped: BTreeMap<(String, IssueKind), (&Issue, usize)> = BTreeMap::new();
        for report in &self.reports {
            let subject = report
                .policy_name
                .clone()
                .unwrap_or_else(|| report.index_name.clone());
            for issue in report.issues.iter().filter(|i| i.severity >= Severity::Warning) {
                grouped
                    .entry((subject.clone(), issue.kind))
                    .and_modify(|(_, count)| *count += 1)
                    .or_insert((issue, 1));
            }
        }

        for ((subject, kind), (issue, count)) in grouped {
            recs.push(Recommendation {
                subject,
                severity: issue.severity,
                kind,
                rule_code: issue.rule_code.clone(),
                affected_indices: count,
                message: issue.message.clone(),
            });
        }

        recs
    }
}

/// Format a day count for display: `30d`, `1.5d`.
pub fn format_days(days: f64) -> String {
    if days.fract() == 0.0 {
        format!("{:.0}d", days)
    } else {
        format!("{:.1}d", days)
    }
}
