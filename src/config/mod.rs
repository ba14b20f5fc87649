pub mod types;

use crate::error::{ConfigError, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub use types::{Config, OutputConfig};

const CONFIG_FILE_NAME: &str = ".ilm-health.toml";

/// Get the global config file path (~/.ilm-health.toml)
pub fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(CONFIG_FILE_NAME))
}

/// Get the local config file path (bundle/.ilm-health.toml)
pub fn local_config_path(bundle_path: &Path) -> PathBuf {
    bundle_path.join(CONFIG_FILE_NAME)
}

/// Load configuration from file or use defaults.
///
/// An explicit path must exist and parse. Otherwise the local config is
/// checked first, then the global config; unreadable discovered files are
/// skipped with a warning.
pub fn load_config(explicit: Option<&Path>, bundle_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = explicit {
        return Ok(read_config(path)?);
    }

    let candidates = bundle_path
        .map(local_config_path)
        .into_iter()
        .chain(global_config_path());

    for path in candidates {
        if !path.exists() {
            continue;
        }
        match read_config(&path) {
            Ok(config) => return Ok(config),
            Err(e) => log::warn!("Ignoring config file: {}", e),
        }
    }

    log::debug!("No config file found, using defaults");
    Ok(Config::default())
}

fn read_config(path: &Path) -> std::result::Result<Config, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
        path: path.to_path_buf(),
        source,
    })?;
    let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParsingFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    config
        .analysis
        .validate()
        .map_err(|reason| ConfigError::ParsingFailed {
            path: path.to_path_buf(),
            reason,
        })?;
    log::debug!("Loaded config from {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::OutputFormat;
    use crate::error::IlmHealthError;

    #[test]
    fn test_local_config_is_used() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            local_config_path(dir.path()),
            "[analysis]\ninclude_system = false\n",
        )
        .unwrap();

        let config = load_config(None, Some(dir.path())).unwrap();
        assert!(!config.analysis.include_system);
    }

    #[test]
    fn test_explicit_config_overrides_local() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            local_config_path(dir.path()),
            "[output]\nformat = \"summary\"\n",
        )
        .unwrap();
        let explicit = dir.path().join("custom.toml");
        fs::write(&explicit, "[output]\nformat = \"json\"\n").unwrap();

        let config = load_config(Some(&explicit), Some(dir.path())).unwrap();
        assert_eq!(config.output.format, OutputFormat::Json);
    }

    #[test]
    fn test_explicit_config_errors() {
        let dir = tempfile::tempdir().unwrap();

        let missing = dir.path().join("missing.toml");
        assert!(matches!(
            load_config(Some(&missing), None),
            Err(IlmHealthError::Config(ConfigError::ReadFailed { .. }))
        ));

        let broken = dir.path().join("broken.toml");
        fs::write(&broken, "[analysis\n").unwrap();
        assert!(matches!(
            load_config(Some(&broken), None),
            Err(IlmHealthError::Config(ConfigError::ParsingFailed { .. }))
        ));
    }

    #[test]
    fn test_invalid_thresholds_are_rejected() {
        let dir = tempfile::tempdir().unwrap();

        for body in [
            "[analysis]\nstaleness_multiplier = -1.0\n",
            "[analysis]\nstaleness_multiplier = 0.0\n",
            "[analysis]\nstaleness_multiplier = nan\n",
            "[analysis]\nstale_hot_fallback_days = -5.0\n",
        ] {
            let path = dir.path().join("thresholds.toml");
            fs::write(&path, body).unwrap();
            assert!(
                matches!(
                    load_config(Some(&path), None),
                    Err(IlmHealthError::Config(ConfigError::ParsingFailed { .. }))
                ),
                "accepted {:?}",
                body
            );
        }
    }

    #[test]
    fn test_invalid_local_config_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            local_config_path(dir.path()),
            "[analysis]\nstaleness_multiplier = -2.0\n",
        )
        .unwrap();

        let config = load_config(None, Some(dir.path())).unwrap();
        assert!(config.analysis.staleness_multiplier > 0.0);
    }
}
