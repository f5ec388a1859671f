//! Statistics about the persisted link file
//!
//! This module provides functionality for inspecting a link store without
//! running any searches.

use crate::store::LinkStore;
use std::collections::BTreeMap;

/// Link file statistics summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreStatistics {
    /// Path of the link file
    pub path: String,

    /// Whether the file exists on disk
    pub exists: bool,

    /// Number of stored entries
    pub total_entries: usize,

    /// Entries in canonical `https://discord.gg/<code>` form
    pub canonical_links: usize,

    /// Entries kept verbatim because they are not invite links
    pub foreign_lines: usize,

    /// Count of invite codes by length
    pub code_lengths: BTreeMap<usize, usize>,
}

/// Computes statistics for a loaded store
pub fn load_statistics(store: &LinkStore) -> StoreStatistics {
    let mut canonical_links = 0;
    let mut code_lengths = BTreeMap::new();

    for link in store.iter() {
        if let Some(code) = link.code() {
            canonical_links += 1;
            *code_lengths.entry(code.len()).or_insert(0) += 1;
        }
    }

    StoreStatistics {
        path: store.path().display().to_string(),
        exists: store.path().exists(),
        total_entries: store.len(),
        canonical_links,
        foreign_lines: store.len() - canonical_links,
        code_lengths,
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &StoreStatistics) {
    println!("=== Link Store Statistics ===\n");

    println!("File: {}", stats.path);
    if !stats.exists {
        println!("  (file does not exist yet)");
    }
    println!();

    println!("Overview:");
    println!("  Total entries: {}", stats.total_entries);
    println!("  Invite links: {}", stats.canonical_links);
    println!("  Other lines: {}", stats.foreign_lines);
    println!();

    if !stats.code_lengths.is_empty() {
        println!("Invite Code Lengths:");
        for (length, count) in &stats.code_lengths {
            let percentage = (*count as f64 / stats.canonical_links as f64) * 100.0;
            println!("  {} chars: {} ({:.1}%)", length, count, percentage);
        }
    }
}
