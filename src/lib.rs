//! Invite-Scout: a Discord invite link harvester
//!
//! This crate discovers Discord invite links by running search queries,
//! scraping result pages, extracting and normalizing invite links, and
//! keeping a deduplicated, file-backed set of everything found so far.

pub mod config;
pub mod discovery;
pub mod fetch;
pub mod invite;
pub mod output;
pub mod query;
pub mod state;
pub mod store;

use thiserror::Error;

/// Main error type for Invite-Scout operations
#[derive(Debug, Error)]
pub enum ScoutError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Store error: {0}")]
    Store(#[from] store::StoreError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::RunState,
        to: state::RunState,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid domain: {0}")]
    InvalidDomain(String),
}

/// Errors raised by a single search or page fetch
///
/// None of these abort a discovery run; the orchestrator logs them and
/// treats the query as having found nothing.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Rate limited by {url}")]
    RateLimited { url: String },

    #[error("HTTP {status_code} from {url}")]
    Status { url: String, status_code: u16 },

    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },

    #[error("Search API error (HTTP {status_code}): {message}")]
    Api { status_code: u16, message: String },

    #[error("Failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },

    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),
}

impl FetchError {
    /// Returns true if the remote side asked us to slow down
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
            || matches!(self, Self::Api { status_code: 429, .. })
    }

    /// Returns true if the request did not complete within its timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Classifies a transport error raised by reqwest
    pub(crate) fn from_reqwest(url: &str, error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
            }
        } else if error.is_connect() {
            Self::Network {
                url: url.to_string(),
                message: "Connection refused".to_string(),
            }
        } else {
            Self::Network {
                url: url.to_string(),
                message: error.to_string(),
            }
        }
    }
}

/// Result type alias for Invite-Scout operations
pub type Result<T> = std::result::Result<T, ScoutError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for fetch operations
pub type FetchResult<T> = std::result::Result<T, FetchError>;

// Re-export commonly used types
pub use config::Config;
pub use discovery::{Orchestrator, ProgressEvent, RunParams};
pub use invite::{extract_invite_links, InviteLink};
pub use query::{Query, QueryCategory, QueryGenerator};
pub use state::RunState;
pub use store::LinkStore;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_classification() {
        let timeout = FetchError::Timeout {
            url: "https://example.com".to_string(),
        };
        assert!(timeout.is_timeout());
        assert!(!timeout.is_rate_limited());

        let limited = FetchError::RateLimited {
            url: "https://example.com".to_string(),
        };
        assert!(limited.is_rate_limited());

        let api_quota = FetchError::Api {
            status_code: 429,
            message: "quota exceeded".to_string(),
        };
        assert!(api_quota.is_rate_limited());

        let status = FetchError::Status {
            url: "https://example.com".to_string(),
            status_code: 503,
        };
        assert!(!status.is_rate_limited());
        assert!(!status.is_timeout());
    }
}
