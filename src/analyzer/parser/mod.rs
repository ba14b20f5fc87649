//! Parsing of raw bundle documents.
//!
//! This module provides:
//! - Time value parsing (`min_age`, `age`)
//! - Policy documents -> [`PolicyModel`](crate::analyzer::types::PolicyModel)
//! - Explain documents -> [`IndexState`](crate::analyzer::types::IndexState)

pub mod duration;
pub mod explain;
pub mod policy;

pub use duration::parse_duration_days;
pub use explain::{build_index_state, build_index_states, strip_rollover_suffix};
pub use policy::{build_policy_model, build_policy_models};
