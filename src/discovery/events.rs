//! Progress events emitted by a discovery run
//!
//! Events travel over an unbounded channel from the worker to whoever
//! renders progress. Sending never blocks, and a dropped receiver is not an
//! error: the run simply keeps going without an audience.

use crate::invite::InviteLink;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

/// Counters describing one processed query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunProgress {
    /// 1-based position of the query within this run
    pub index: usize,

    /// Number of queries scheduled for this run
    pub total: usize,

    /// Human-readable description of the query
    pub label: String,

    /// Links this query added to the store
    pub new_links: usize,

    /// Store size after merging this query
    pub total_links: usize,
}

/// An event in the ordered progress stream of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// Free-form log line
    Log(String),

    /// A query finished and its results were merged
    Progress(RunProgress),

    /// Links discovered for the first time by the last query
    NewLinks(Vec<InviteLink>),

    /// The store was persisted mid-run
    Checkpoint { total_links: usize },

    /// Every scheduled query ran and the store was persisted
    Completed { total_links: usize },

    /// The run stopped on request and the store was persisted
    Cancelled { total_links: usize },

    /// The final persist failed
    Failed { reason: String },
}

impl ProgressEvent {
    /// Returns true for the event that ends a run's stream
    pub fn is_final(&self) -> bool {
        matches!(
            self,
            Self::Completed { .. } | Self::Cancelled { .. } | Self::Failed { .. }
        )
    }
}

/// Sending half of the progress stream
#[derive(Debug, Clone, Default)]
pub struct EventSink {
    tx: Option<UnboundedSender<ProgressEvent>>,
}

impl EventSink {
    /// Creates a connected sink and its receiver
    pub fn channel() -> (Self, UnboundedReceiver<ProgressEvent>) {
        let (tx, rx) = unbounded_channel();
        (Self { tx: Some(tx) }, rx)
    }

    /// Creates a sink that discards every event
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    /// Emits an event
    pub fn emit(&self, event: ProgressEvent) {
        if let Some(tx) = &self.tx {
            // Receiver gone means nobody is watching
            let _ = tx.send(event);
        }
    }

    /// Emits a log line
    pub fn log(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!("{}", message);
        self.emit(ProgressEvent::Log(message));
    }
}
