//! Summary of a finished discovery run

use crate::state::RunState;
use chrono::{DateTime, Utc};

/// Counters and timestamps describing one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Terminal state the run ended in
    pub state: RunState,

    /// Queries the generator produced in total
    pub queries_generated: usize,

    /// Queries scheduled for this run after `start_at` and `max_queries`
    pub queries_scheduled: usize,

    /// Queries actually dispatched
    pub queries_attempted: usize,

    /// Links added to the store by this run
    pub new_links: usize,

    /// Store size after the final persist
    pub total_links: usize,

    /// Generated index a follow-up run should start at
    pub next_index: usize,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunSummary {
    /// Wall-clock duration of the run in whole seconds
    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds().max(0)
    }

    /// Returns true if queries remain after this run
    pub fn has_remaining(&self) -> bool {
        self.next_index < self.queries_generated
    }
}

/// Prints a run summary to stdout
pub fn print_summary(summary: &RunSummary) {
    println!("=== Discovery Run {} ===\n", summary.state);

    println!("Queries:");
    println!("  Generated: {}", summary.queries_generated);
    println!("  Scheduled: {}", summary.queries_scheduled);
    println!("  Attempted: {}", summary.queries_attempted);
    println!();

    println!("Links:");
    println!("  New this run: {}", summary.new_links);
    println!("  Total stored: {}", summary.total_links);
    println!();

    println!(
        "Duration: {}s ({} -> {})",
        summary.duration_seconds(),
        summary.started_at.format("%Y-%m-%d %H:%M:%S"),
        summary.finished_at.format("%H:%M:%S")
    );

    if summary.has_remaining() {
        println!("Resume with: --start-at {}", summary.next_index);
    }
}
