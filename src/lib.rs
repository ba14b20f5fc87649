//! # ILM Health
//!
//! Reconciles Elasticsearch ILM policy definitions against the live
//! lifecycle state of indices captured in a cluster diagnostic bundle.
//!
//! ## Features
//!
//! - **Effective Retention**: Resolves the delete-phase `min_age` that governs each index
//! - **Lifecycle Errors**: Flags stuck steps, dangling policy references and stale hot indices
//! - **Policy Recommendations**: Suggests missing warm/frozen phases and other policy fixes
//! - **Multiple Formats**: Table, JSON and summary output, plus JSON export
//!
//! ## Example
//!
//! ```rust,no_run
//! use ilm_health::{DiagnosticBundle, analyzer::{IlmHealthConfig, run}};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let bundle = DiagnosticBundle::from_dir(Path::new("./diagnostics"))?;
//! let report = run(
//!     &bundle.load_policies()?,
//!     &bundle.load_explain()?,
//!     &IlmHealthConfig::default(),
//! );
//! println!("health: {:.1}%", report.health.score);
//! # Ok(())
//! # }
//! ```

pub mod analyzer;
pub mod bundle;
pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;

// Re-export commonly used types and functions
pub use analyzer::{IlmHealthConfig, Report, run};
pub use bundle::DiagnosticBundle;
pub use error::{IlmHealthError, Result};
pub use handlers::*;
use cli::Commands;
use std::path::Path;

/// The current version of the CLI tool
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn run_command(command: Commands, config_path: Option<&Path>) -> Result<()> {
    match command {
        Commands::Analyze {
            path,
            policies,
            explain,
            errors,
            format,
            view,
            policies_only,
            staleness_multiplier,
            severity,
            ignore,
            hide_system,
            report_unmanaged,
            output,
            export,
            export_issues,
        } => {
            let config = config::load_config(config_path, Some(&path))?;
            let options = AnalyzeOptions {
                policies,
                explain,
                errors,
                format,
                view,
                policies_only,
                staleness_multiplier,
                severity,
                ignore,
                hide_system,
                report_unmanaged,
                output,
                export,
                export_issues,
            };
            handlers::handle_analyze(&path, options, config).map(|_| ())
        }
    }
}
