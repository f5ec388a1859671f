//! Configuration module for Invite-Scout
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file, plus the optional JSON credential file for the
//! structured search API.
//!
//! # Example
//!
//! ```no_run
//! use invite_scout::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("scout.toml")).unwrap();
//! println!("Checkpoint every {} queries", config.pacing.checkpoint_every);
//! ```

mod credentials;
mod parser;
mod types;
mod validation;

// Re-export types
pub use credentials::{load_credentials, ApiCredentials, DEFAULT_CREDENTIALS_PATH};
pub use types::{ApiConfig, Config, PacingConfig, QueryConfig, SearchConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
