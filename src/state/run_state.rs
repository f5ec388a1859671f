/// Run state definitions for the discovery orchestrator
///
/// A run moves `Idle → Running → {Completed | Cancelled | Failed}` and never
/// leaves a terminal state.
use std::fmt;

/// Represents the lifecycle state of a discovery run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunState {
    /// Constructed but not started
    Idle,

    /// Dispatching queries
    Running,

    // ===== Terminal States =====
    /// Every scheduled query ran and the final persist succeeded
    Completed,

    /// Stopped on request; the final persist succeeded
    Cancelled,

    /// The final persist failed
    Failed,
}

impl RunState {
    /// Returns true if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::Failed)
    }

    /// Returns true if the run finished without losing data
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Returns true if moving from `self` to `next` is allowed
    pub fn can_transition_to(&self, next: RunState) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Running)
                | (Self::Running, Self::Completed)
                | (Self::Running, Self::Cancelled)
                | (Self::Running, Self::Failed)
        )
    }

    /// Returns a lowercase name for display and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
