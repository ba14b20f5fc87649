//! Policy model building.
//!
//! Normalizes raw policy documents into [`PolicyModel`]s. Every input key
//! yields exactly one model; problems are recorded on the model instead of
//! failing the run.

use super::duration::parse_duration_days;
use crate::analyzer::types::{Phase, PhaseDefinition, PolicyModel};
use crate::error::ParseError;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};

/// Build models for every policy document.
pub fn build_policy_models(docs: &BTreeMap<String, Value>) -> BTreeMap<String, PolicyModel> {
    docs.iter()
        .map(|(name, doc)| (name.clone(), build_policy_model(name, doc)))
        .collect()
}

/// Build the model for a single policy.
///
/// Accepts both the bundle shape (`{"policy": {"phases": ...},
/// "modified_date": ..., "in_use_by": ...}`) and a bare `{"phases": ...}`.
pub fn build_policy_model(name: &str, doc: &Value) -> PolicyModel {
    let mut model = PolicyModel::new(name);

    let Some(obj) = doc.as_object() else {
        log::warn!("Policy '{}' is not a JSON object", name);
        model
            .parse_errors
            .push(ParseError::bad_document("policy", "is not a JSON object"));
        return model;
    };

    model.last_modified = obj
        .get("modified_date")
        .and_then(Value::as_str)
        .and_then(|raw| parse_timestamp(name, raw));

    model.in_use_by = obj
        .get("in_use_by")
        .and_then(|u| u.get("indices"))
        .and_then(Value::as_array)
        .map(|indices| {
            indices
                .iter()
                .filter_map(Value::as_str)
                .map(String::from)
                .collect()
        })
        .unwrap_or_default();

    let phases = obj
        .get("policy")
        .and_then(|p| p.get("phases"))
        .or_else(|| obj.get("phases"));

    match phases {
        None | Some(Value::Null) => {
            log::debug!("Policy '{}' has no phases", name);
        }
        Some(Value::Object(phases)) => {
            build_phases(name, phases, &mut model);
        }
        Some(_) => {
            model
                .parse_errors
                .push(ParseError::bad_document("phases", "is not an object"));
        }
    }

    // A single bad value makes the whole retention unknown
    model.retention_days = if model.is_malformed() {
        None
    } else {
        model.phase(Phase::Delete).and_then(|p| p.min_age_days)
    };

    if model.is_malformed() {
        log::warn!(
            "Policy '{}' is malformed: {} problem(s)",
            name,
            model.parse_errors.len()
        );
    }

    model
}

fn build_phases(policy_name: &str, phases: &Map<String, Value>, model: &mut PolicyModel) {
    for key in phases.keys() {
        if Phase::parse(key).is_none() {
            log::debug!("Policy '{}': ignoring unknown phase '{}'", policy_name, key);
        }
    }

    // Iterate in lifecycle order, not document order
    for phase in Phase::ALL {
        let Some(raw) = phases.get(phase.as_str()) else {
            continue;
        };

        match build_phase(phase, raw) {
            Ok(definition) => model.phases.push(definition),
            Err((definition, err)) => {
                model.parse_errors.push(err);
                if let Some(definition) = definition {
                    model.phases.push(definition);
                }
            }
        }
    }
}

/// Build one phase. On error the partially built phase (if any) is
/// returned alongside the error so it can still be displayed.
fn build_phase(
    phase: Phase,
    raw: &Value,
) -> Result<PhaseDefinition, (Option<PhaseDefinition>, ParseError)> {
    let field = format!("phases.{}", phase);

    let Some(obj) = raw.as_object() else {
        return Err((None, ParseError::bad_document(field, "is not an object")));
    };

    let actions: BTreeSet<String> = obj
        .get("actions")
        .and_then(Value::as_object)
        .map(|a| a.keys().cloned().collect())
        .unwrap_or_default();

    let min_age_field = format!("{}.min_age", field);
    let (min_age, parsed) = match obj.get("min_age") {
        None | Some(Value::Null) => ("0ms".to_string(), Ok(0.0)),
        Some(Value::String(s)) => (s.clone(), parse_duration_days(s, &min_age_field)),
        Some(other) => (
            other.to_string(),
            Err(ParseError::bad_duration(&min_age_field, other.to_string())),
        ),
    };

    match parsed {
        Ok(days) => Ok(PhaseDefinition {
            phase,
            min_age,
            min_age_days: Some(days),
            actions,
        }),
        Err(err) => Err((
            Some(PhaseDefinition {
                phase,
                min_age,
                min_age_days: None,
                actions,
            }),
            err,
        )),
    }
}

fn parse_timestamp(policy_name: &str, raw: &str) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => Some(ts.with_timezone(&Utc)),
        Err(e) => {
            log::debug!(
                "Policy '{}': unparseable modified_date '{}': {}",
                policy_name,
                raw,
                e
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::types::Retention;
    use serde_json::json;

    #[test]
    fn test_bundle_shaped_policy() {
        let doc = json!({
            "version": 3,
            "modified_date": "2024-05-01T10:00:00.000Z",
            "policy": {
                "phases": {
                    "delete": { "min_age": "90d", "actions": { "delete": {} } },
                    "hot": { "min_age": "0ms", "actions": { "rollover": { "max_age": "7d" } } },
                    "warm": { "min_age": "7d", "actions": { "shrink": {}, "forcemerge": {} } }
                }
            },
            "in_use_by": { "indices": ["logs-app-2024.05.01-000001"] }
        });

        let model = build_policy_model("logs-app", &doc);

        assert_eq!(model.name, "logs-app");
        assert_eq!(model.retention_days, Some(90.0));
        assert_eq!(model.retention(), Retention::Days(90.0));
        assert!(model.last_modified.is_some());
        assert_eq!(model.in_use_by, vec!["logs-app-2024.05.01-000001"]);

        let order: Vec<Phase> = model.phases.iter().map(|p| p.phase).collect();
        assert_eq!(order, vec![Phase::Hot, Phase::Warm, Phase::Delete]);

        let warm = model.phase(Phase::Warm).unwrap();
        assert!(warm.actions.contains("shrink"));
        assert!(warm.actions.contains("forcemerge"));
    }

    #[test]
    fn test_bare_phases_document() {
        let doc = json!({ "phases": { "hot": { "min_age": "0d" }, "delete": { "min_age": "30d" } } });
        let model = build_policy_model("P", &doc);
        assert_eq!(model.retention_days, Some(30.0));
        assert!(!model.is_malformed());
    }

    #[test]
    fn test_no_delete_phase_is_unbounded() {
        let doc = json!({ "policy": { "phases": { "hot": { "min_age": "0ms", "actions": {} } } } });
        let model = build_policy_model("forever", &doc);
        assert_eq!(model.retention_days, None);
        assert_eq!(model.retention(), Retention::Unbounded);
    }

    #[test]
    fn test_bad_duration_degrades_policy() {
        let doc = json!({ "policy": { "phases": {
            "hot": { "min_age": "0ms" },
            "delete": { "min_age": "30 fortnights" }
        } } });

        let model = build_policy_model("broken", &doc);

        assert_eq!(model.retention_days, None);
        assert_eq!(model.retention(), Retention::Unknown);
        assert_eq!(model.parse_errors.len(), 1);
        assert!(matches!(model.parse_errors[0], ParseError::BadDuration { .. }));
        // The phase is kept for display even though its age is unknown
        assert_eq!(model.phase(Phase::Delete).unwrap().min_age_days, None);
    }

    #[test]
    fn test_missing_min_age_defaults_to_zero() {
        let doc = json!({ "phases": { "delete": { "actions": { "delete": {} } } } });
        let model = build_policy_model("immediate", &doc);
        assert_eq!(model.retention_days, Some(0.0));
    }

    #[test]
    fn test_non_object_document() {
        let model = build_policy_model("weird", &json!("not a policy"));
        assert!(model.is_malformed());
        assert!(model.phases.is_empty());
        assert_eq!(model.retention(), Retention::Unknown);
    }

    #[test]
    fn test_unknown_phase_is_ignored() {
        let doc = json!({ "phases": { "lukewarm": { "min_age": "1d" }, "hot": {} } });
        let model = build_policy_model("p", &doc);
        assert_eq!(model.phases.len(), 1);
        assert!(!model.is_malformed());
    }

    #[test]
    fn test_build_is_total_over_input_keys() {
        let mut docs = BTreeMap::new();
        docs.insert("a".to_string(), json!({ "phases": {} }));
        docs.insert("b".to_string(), json!(42));
        docs.insert("c".to_string(), json!({ "phases": { "delete": { "min_age": "bad" } } }));

        let models = build_policy_models(&docs);
        assert_eq!(models.len(), 3);
        assert!(models.keys().eq(docs.keys()));
    }
}
