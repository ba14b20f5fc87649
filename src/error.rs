//! Error types for ILM health analysis.
//!
//! Only [`LoadError`] and [`ConfigError`] abort a run. [`ParseError`] is
//! recorded on the policy or index it came from and later surfaced as an
//! issue in the report.

use serde::{Serialize, Serializer};
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error for the library and the CLI.
#[derive(Debug, Error)]
pub enum IlmHealthError {
    /// A diagnostic bundle file could not be loaded
    #[error(transparent)]
    Load(#[from] LoadError),

    /// The configuration file could not be read or parsed
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Filesystem error while writing output
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Report could not be serialized
    #[error("Failed to serialize report: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Failure to load one of the bundle documents.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file does not exist
    #[error("File not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// The file exists but is not valid JSON (or not the expected shape)
    #[error("Invalid JSON in {}: {reason}", path.display())]
    InvalidJson { path: PathBuf, reason: String },
}

impl LoadError {
    pub fn invalid_json(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::InvalidJson {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// A single policy or index document could not be fully interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A `min_age` or `age` value uses an unrecognized format or unit
    #[error("unrecognized duration '{value}' in {field}")]
    BadDuration { field: String, value: String },

    /// A document (or a required part of it) has the wrong shape
    #[error("malformed document: {field} {reason}")]
    BadDocument { field: String, reason: String },
}

impl ParseError {
    pub fn bad_duration(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::BadDuration {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn bad_document(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::BadDocument {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl Serialize for ParseError {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {}: {reason}", path.display())]
    ParsingFailed { path: PathBuf, reason: String },
}

/// Result type alias used across the crate.
pub type Result<T> = std::result::Result<T, IlmHealthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_serializes_as_message() {
        let err = ParseError::bad_duration("phases.delete.min_age", "30x");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(
            json,
            serde_json::json!("unrecognized duration '30x' in phases.delete.min_age")
        );
    }

    #[test]
    fn test_load_error_wraps_into_top_level() {
        let err: IlmHealthError = LoadError::NotFound {
            path: PathBuf::from("bundle/ilm_policies.json"),
        }
        .into();
        assert!(matches!(err, IlmHealthError::Load(LoadError::NotFound { .. })));
        assert_eq!(err.to_string(), "File not found: bundle/ilm_policies.json");
    }
}
