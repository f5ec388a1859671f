//! State module for tracking discovery runs
//!
//! # Components
//!
//! - `RunState`: lifecycle of a single discovery run

mod run_state;

pub use run_state::RunState;
