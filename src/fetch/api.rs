//! Structured search API provider
//!
//! Calls the provider's JSON query endpoint instead of scraping HTML. The
//! provider enforces a small daily quota; nothing is tracked locally and a
//! quota error is simply surfaced like any other API error.

use crate::config::{ApiConfig, ApiCredentials};
use crate::fetch::provider::SearchProvider;
use crate::invite::{extract_invite_links, InviteLink};
use crate::{FetchError, FetchResult};
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration;

/// The provider never returns more than this many items per call
const MAX_RESULTS_PER_CALL: u32 = 10;

/// Longest slice of an error body kept in `FetchError::Api`
const MAX_ERROR_BODY: usize = 200;

/// One item of a structured search response
///
/// Only scanned for invite links, never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub link: String,

    #[serde(default)]
    pub snippet: String,
}

impl SearchResult {
    /// Invite links embedded anywhere in the title, link or snippet
    pub fn invite_links(&self) -> HashSet<InviteLink> {
        extract_invite_links(&format!("{} {} {}", self.title, self.link, self.snippet))
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchResult>,
}

/// Search provider backed by the structured search API
#[derive(Debug, Clone)]
pub struct StructuredApiProvider {
    client: Client,
    endpoint: String,
    api_key: String,
    search_engine_id: String,
    results_per_call: u32,
}

impl StructuredApiProvider {
    /// Creates a provider if the credentials are complete
    ///
    /// # Returns
    ///
    /// * `Ok(Some(provider))` - Credentials were complete
    /// * `Ok(None)` - Key or search engine id missing; use scraping instead
    /// * `Err(reqwest::Error)` - Failed to build the HTTP client
    pub fn from_credentials(
        config: &ApiConfig,
        credentials: &ApiCredentials,
    ) -> Result<Option<Self>, reqwest::Error> {
        let Some((api_key, search_engine_id)) = credentials.complete() else {
            return Ok(None);
        };

        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .gzip(true)
            .build()?;

        Ok(Some(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: api_key.to_string(),
            search_engine_id: search_engine_id.to_string(),
            results_per_call: config.results_per_call.min(MAX_RESULTS_PER_CALL),
        }))
    }

    /// Runs one structured query and returns the raw result items
    pub async fn query(&self, query: &str) -> FetchResult<Vec<SearchResult>> {
        let num = self.results_per_call.to_string();
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("key", self.api_key.as_str()),
                ("cx", self.search_engine_id.as_str()),
                ("q", query),
                ("num", num.as_str()),
            ])
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(&self.endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Api {
                status_code: status.as_u16(),
                message: body.chars().take(MAX_ERROR_BODY).collect(),
            });
        }

        let parsed: SearchResponse = response.json().await.map_err(|e| FetchError::Decode {
            url: self.endpoint.clone(),
            message: e.to_string(),
        })?;

        Ok(parsed.items)
    }
}

impl SearchProvider for StructuredApiProvider {
    async fn search(&self, query: &str) -> FetchResult<HashSet<InviteLink>> {
        let items = self.query(query).await?;
        tracing::debug!("Structured API returned {} items for {}", items.len(), query);

        Ok(items.iter().flat_map(SearchResult::invite_links).collect())
    }

    fn name(&self) -> &'static str {
        "structured-api"
    }
}
