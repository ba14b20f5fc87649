use crate::analyzer::{IlmHealthConfig, OutputFormat, ReportView};
use serde::{Deserialize, Serialize};

/// Main configuration structure, as read from `.ilm-health.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub analysis: IlmHealthConfig,
    pub output: OutputConfig,
}

/// Output configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub view: ReportView,
}
