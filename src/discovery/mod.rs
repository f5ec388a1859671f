//! Discovery module - drives a run from queries to persisted links
//!
//! This module contains:
//! - The orchestrator that walks the query plan and merges results
//! - The progress event stream consumed by the CLI
//! - Cancellable pacing between requests
//! - Direct page scraping for user-supplied URLs

mod events;
mod orchestrator;
mod pacing;
mod pages;

pub use events::{EventSink, ProgressEvent, RunProgress};
pub use orchestrator::{Orchestrator, RunParams};
pub use pacing::{jitter_delay, sleep_or_cancel};
pub use pages::scrape_pages;

use crate::store::{LinkStore, SharedLinkStore};
use std::sync::{MutexGuard, PoisonError};

/// Locks the shared store, recovering the data if a reader panicked
pub(crate) fn lock_store(store: &SharedLinkStore) -> MutexGuard<'_, LinkStore> {
    store.lock().unwrap_or_else(PoisonError::into_inner)
}
