//! Structured search API credentials
//!
//! Credentials live in a small JSON record next to the link file. A missing
//! file, unreadable JSON, or missing fields all mean "no API"; none of these
//! is an error.

use serde::Deserialize;
use std::path::Path;

/// Credential file consulted when none is given on the command line
pub const DEFAULT_CREDENTIALS_PATH: &str = "google_api_config.json";

/// API key and search-scope identifier for the structured search API
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ApiCredentials {
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default)]
    pub search_engine_id: Option<String>,
}

impl ApiCredentials {
    /// Creates credentials from explicit values
    pub fn new(api_key: impl Into<String>, search_engine_id: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            search_engine_id: Some(search_engine_id.into()),
        }
    }

    /// Layers explicit values over these, field by field
    ///
    /// An explicit `Some` wins; `None` keeps the value read from the file.
    pub fn with_overrides(self, api_key: Option<String>, search_engine_id: Option<String>) -> Self {
        Self {
            api_key: api_key.or(self.api_key),
            search_engine_id: search_engine_id.or(self.search_engine_id),
        }
    }

    /// Returns `(api_key, search_engine_id)` when both are present and non-blank
    pub fn complete(&self) -> Option<(&str, &str)> {
        let key = self.api_key.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        let cx = self
            .search_engine_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())?;
        Some((key, cx))
    }
}

/// Reads the credential file, defaulting silently on any problem
pub fn load_credentials(path: &Path) -> ApiCredentials {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            tracing::debug!("No credential file at {}: {}", path.display(), e);
            return ApiCredentials::default();
        }
    };

    match serde_json::from_str(&content) {
        Ok(credentials) => credentials,
        Err(e) => {
            tracing::debug!("Ignoring malformed credential file {}: {}", path.display(), e);
            ApiCredentials::default()
        }
    }
}
