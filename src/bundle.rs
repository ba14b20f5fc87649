//! Diagnostic bundle loading.
//!
//! A support-diagnostics bundle keeps the ILM documents either at its root
//! or under `commercial/`. This module locates and reads them; parsing of
//! the individual documents happens in [`crate::analyzer::parser`].

use crate::error::LoadError;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

pub const POLICIES_FILE: &str = "ilm_policies.json";
pub const EXPLAIN_FILE: &str = "ilm_explain.json";
pub const EXPLAIN_ERRORS_FILE: &str = "ilm_explain_only_errors.json";

/// Subdirectory used by newer bundle layouts.
pub const COMMERCIAL_DIR: &str = "commercial";

/// Location of the ILM documents of one bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticBundle {
    pub policies_path: PathBuf,
    pub explain_path: PathBuf,
    /// Optional errors-only explain output, overlaid on the explain entries
    pub errors_path: Option<PathBuf>,
}

impl DiagnosticBundle {
    /// Locate the documents inside a bundle directory.
    ///
    /// The directory itself is tried first, then its `commercial/`
    /// subdirectory. The errors-only file is optional.
    pub fn from_dir(dir: &Path) -> Result<Self, LoadError> {
        if !dir.is_dir() {
            return Err(LoadError::NotFound {
                path: dir.to_path_buf(),
            });
        }

        let root = [dir.to_path_buf(), dir.join(COMMERCIAL_DIR)]
            .into_iter()
            .find(|candidate| candidate.join(POLICIES_FILE).is_file())
            .unwrap_or_else(|| dir.to_path_buf());

        log::debug!("Using bundle root {}", root.display());

        let errors_path = root.join(EXPLAIN_ERRORS_FILE);
        Ok(Self {
            policies_path: root.join(POLICIES_FILE),
            explain_path: root.join(EXPLAIN_FILE),
            errors_path: errors_path.is_file().then_some(errors_path),
        })
    }

    /// Use explicit file paths. `.json` is appended when missing.
    pub fn from_files(policies: impl AsRef<Path>, explain: impl AsRef<Path>) -> Self {
        Self {
            policies_path: with_json_extension(policies.as_ref()),
            explain_path: with_json_extension(explain.as_ref()),
            errors_path: None,
        }
    }

    pub fn with_errors(mut self, errors: impl AsRef<Path>) -> Self {
        self.errors_path = Some(with_json_extension(errors.as_ref()));
        self
    }

    /// Read the policy documents, keyed by policy name.
    pub fn load_policies(&self) -> Result<BTreeMap<String, Value>, LoadError> {
        let document = read_json(&self.policies_path)?;
        let Value::Object(policies) = document else {
            return Err(LoadError::invalid_json(
                &self.policies_path,
                "expected an object keyed by policy name",
            ));
        };

        log::info!(
            "Loaded {} policies from {}",
            policies.len(),
            self.policies_path.display()
        );
        Ok(policies.into_iter().collect())
    }

    /// Read the explain entries, keyed by index name.
    ///
    /// Entries from the errors-only file replace the matching explain
    /// entries, and are added when the index is absent from the explain
    /// file.
    pub fn load_explain(&self) -> Result<BTreeMap<String, Value>, LoadError> {
        let mut indices: BTreeMap<String, Value> =
            read_indices(&self.explain_path)?.into_iter().collect();
        log::info!(
            "Loaded {} explain entries from {}",
            indices.len(),
            self.explain_path.display()
        );

        if let Some(errors_path) = &self.errors_path {
            let errors = read_indices(errors_path)?;
            log::info!(
                "Overlaying {} error entries from {}",
                errors.len(),
                errors_path.display()
            );
            indices.extend(errors);
        }

        Ok(indices)
    }
}

fn read_json(path: &Path) -> Result<Value, LoadError> {
    if !path.is_file() {
        return Err(LoadError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let content = fs::read_to_string(path).map_err(|e| LoadError::invalid_json(path, e))?;
    serde_json::from_str(&content).map_err(|e| LoadError::invalid_json(path, e))
}

/// The `indices` object of an explain document.
fn read_indices(path: &Path) -> Result<Map<String, Value>, LoadError> {
    let Value::Object(mut document) = read_json(path)? else {
        return Err(LoadError::invalid_json(path, "expected an object"));
    };

    match document.remove("indices") {
        Some(Value::Object(indices)) => Ok(indices),
        Some(_) => Err(LoadError::invalid_json(
            path,
            "'indices' is not an object keyed by index name",
        )),
        None => {
            log::warn!("{} has no 'indices' object", path.display());
            Ok(Map::new())
        }
    }
}

fn with_json_extension(path: &Path) -> PathBuf {
    if path.extension().is_some_and(|ext| ext == "json") {
        return path.to_path_buf();
    }
    let mut raw = OsString::from(path.as_os_str());
    raw.push(".json");
    PathBuf::from(raw)
}
