//! Output formatting for reconciliation reports.
//!
//! Supports table, JSON, and plain text summary output, plus JSON export
//! of the full report or only the indices with issues.

mod export;
mod output;

pub use export::{auto_export_path, export_issues, export_report};
pub use output::{OutputFormat, ReportView, format_report, format_report_to_string};
