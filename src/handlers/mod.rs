// Handler modules
pub mod analyze;

pub use analyze::{AnalyzeOptions, handle_analyze};
