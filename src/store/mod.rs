//! Storage module for discovered invite links
//!
//! This module handles the deduplicated link set and its text-file backing:
//! - Loading a previous run's file at startup
//! - Merging fetch results while reporting what is new
//! - Atomic, sorted persistence

mod link_store;

pub use link_store::{LinkStore, SharedLinkStore, DEFAULT_OUTPUT_PATH};

use thiserror::Error;

/// Errors that can occur during store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to replace {path}: {source}")]
    Rename {
        path: String,
        source: std::io::Error,
    },
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
