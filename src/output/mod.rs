//! Output module for run summaries and store reports
//!
//! This module handles:
//! - The summary a discovery run returns
//! - Statistics about the persisted link file
//! - Markdown reports of a finished run

mod markdown;
pub mod stats;
mod summary;

pub use markdown::{format_markdown_summary, generate_markdown_summary};
pub use stats::{load_statistics, print_statistics, StoreStatistics};
pub use summary::{print_summary, RunSummary};

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
