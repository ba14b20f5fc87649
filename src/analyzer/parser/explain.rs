//! Explain state building.
//!
//! Normalizes per-index lifecycle explain documents into [`IndexState`]s.
//! Unmanaged indices are kept (with phase `n/a`) so they can still be
//! reported on downstream.

use super::duration::parse_duration_days;
use crate::analyzer::types::{IndexState, PHASE_NOT_APPLICABLE};
use crate::error::ParseError;
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Rollover suffix: `-2024.09.27-000001`
static ROLLOVER_SUFFIX_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-\d{4}\.\d{2}\.\d{2}-\d{6}$").expect("suffix regex is valid"));

/// Strip the date/generation suffix that rollover appends to index names.
///
/// # Examples
/// - "logs-app-2024.09.27-000001" -> "logs-app"
/// - "orders-000003" -> "orders-000003"
pub fn strip_rollover_suffix(index_name: &str) -> String {
    ROLLOVER_SUFFIX_REGEX.replace(index_name, "").into_owned()
}

/// Build states for every index in the explain document.
pub fn build_index_states(docs: &BTreeMap<String, Value>) -> BTreeMap<String, IndexState> {
    docs.iter()
        .map(|(name, doc)| (name.clone(), build_index_state(name, doc)))
        .collect()
}

/// Build the state for a single index. Never fails: missing optional
/// fields default to empty values.
pub fn build_index_state(index_name: &str, doc: &Value) -> IndexState {
    let mut state = IndexState::unmanaged(index_name);

    let Some(obj) = doc.as_object() else {
        log::warn!("Explain entry for '{}' is not a JSON object", index_name);
        state
            .parse_errors
            .push(ParseError::bad_document("explain", "is not a JSON object"));
        return state;
    };

    let policy = obj
        .get("policy")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|p| !p.is_empty());
    let managed_flag = obj.get("managed").and_then(Value::as_bool);

    state.managed = managed_flag.unwrap_or(policy.is_some()) && policy.is_some();
    state.action = string_field(obj.get("action"));
    state.step = string_field(obj.get("step"));
    state.failed_step = obj
        .get("failed_step")
        .and_then(Value::as_str)
        .map(String::from);
    state.step_info = non_empty(obj.get("step_info"));
    state.previous_step_info = non_empty(obj.get("previous_step_info"));

    if state.managed {
        state.policy_name = policy.map(String::from);
        state.current_phase = string_field(obj.get("phase")).to_lowercase();
    } else {
        log::debug!("Index '{}' is not managed by ILM", index_name);
        state.current_phase = PHASE_NOT_APPLICABLE.to_string();
    }

    match obj.get("age") {
        None | Some(Value::Null) => {}
        Some(Value::String(raw)) => match parse_duration_days(raw, "age") {
            Ok(days) => state.age_days = Some(days),
            Err(err) => {
                log::debug!("Index '{}': {}", index_name, err);
                state.parse_errors.push(err);
            }
        },
        Some(other) => state
            .parse_errors
            .push(ParseError::bad_duration("age", other.to_string())),
    }

    state
}

fn string_field(value: Option<&Value>) -> String {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .unwrap_or_default()
        .to_string()
}

/// Keep a payload only if it carries something.
fn non_empty(value: Option<&Value>) -> Option<Value> {
    match value? {
        Value::Null => None,
        Value::Object(map) if map.is_empty() => None,
        Value::Array(items) if items.is_empty() => None,
        Value::String(s) if s.trim().is_empty() => None,
        other => Some(other.clone()),
    }
}
