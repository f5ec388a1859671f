//! Search provider seam
//!
//! A [`SearchProvider`] turns a fully scoped query string into the invite
//! links found in its results. Two backends exist:
//!
//! - [`ScrapingProvider`]: scrapes the engine's HTML results page; always
//!   available
//! - [`StructuredApiProvider`]: the optional JSON API
//!
//! [`ProviderChain`] is chosen at construction and tries the API first when
//! one is configured, falling back to scraping.

use crate::config::SearchConfig;
use crate::fetch::api::StructuredApiProvider;
use crate::fetch::fetcher::{build_http_client, fetch_html};
use crate::fetch::parser::{extract_from_page, extract_from_search_results};
use crate::invite::InviteLink;
use crate::{FetchError, FetchResult};
use reqwest::Client;
use std::collections::HashSet;
use std::future::Future;
use url::Url;

/// A backend that runs search queries
///
/// Implementations must be `Send + Sync` so a run can live on its own task.
pub trait SearchProvider: Send + Sync {
    /// Runs a scoped query and returns the invite links found in the results
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] if the request fails, times out, is rate
    /// limited, or the response cannot be decoded.
    fn search(
        &self,
        query: &str,
    ) -> impl Future<Output = FetchResult<HashSet<InviteLink>>> + Send;

    /// Short name used in logs
    fn name(&self) -> &'static str;
}

/// Search provider that scrapes the engine's HTML results page
#[derive(Debug, Clone)]
pub struct ScrapingProvider {
    client: Client,
    config: SearchConfig,
    referer: Option<String>,
}

impl ScrapingProvider {
    /// Creates a scraping provider for the configured search engine
    pub fn new(config: &SearchConfig) -> Result<Self, reqwest::Error> {
        let client = build_http_client(config)?;
        let referer = Url::parse(&config.base_url)
            .ok()
            .map(|url| url.origin().ascii_serialization() + "/");

        Ok(Self {
            client,
            config: config.clone(),
            referer,
        })
    }

    /// Fetches an arbitrary page and extracts the invite links it contains
    ///
    /// Relative hyperlinks are resolved against the final page URL.
    pub async fn scrape_page(&self, url: &str) -> FetchResult<HashSet<InviteLink>> {
        let base_url = Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", url, e)))?;

        let page = fetch_html(&self.client, url, &[], None).await?;
        let base_url = Url::parse(&page.final_url).unwrap_or(base_url);

        Ok(extract_from_page(&page.body, &base_url))
    }
}

impl SearchProvider for ScrapingProvider {
    async fn search(&self, query: &str) -> FetchResult<HashSet<InviteLink>> {
        let num = self.config.results_per_page.to_string();
        let params = [
            ("q", query),
            ("num", num.as_str()),
            ("hl", self.config.language.as_str()),
        ];

        let page = fetch_html(
            &self.client,
            &self.config.base_url,
            &params,
            self.referer.as_deref(),
        )
        .await?;

        Ok(extract_from_search_results(&page.body))
    }

    fn name(&self) -> &'static str {
        "scraping"
    }
}

/// The provider used by real runs
///
/// With an API configured, each query goes to the API first. An API error or
/// an empty API answer falls through to scraping, so a missing quota never
/// stops a run.
#[derive(Debug, Clone)]
pub struct ProviderChain {
    api: Option<StructuredApiProvider>,
    scraper: ScrapingProvider,
}

impl ProviderChain {
    /// Creates a chain from an optional API provider and the scraper
    pub fn new(api: Option<StructuredApiProvider>, scraper: ScrapingProvider) -> Self {
        Self { api, scraper }
    }

    /// Creates a chain that only scrapes
    pub fn scraping_only(scraper: ScrapingProvider) -> Self {
        Self::new(None, scraper)
    }

    /// Returns true if the structured API is tried first
    pub fn has_api(&self) -> bool {
        self.api.is_some()
    }

    /// Returns the scraping fallback
    pub fn scraper(&self) -> &ScrapingProvider {
        &self.scraper
    }
}

impl SearchProvider for ProviderChain {
    async fn search(&self, query: &str) -> FetchResult<HashSet<InviteLink>> {
        if let Some(api) = &self.api {
            match api.search(query).await {
                Ok(links) if !links.is_empty() => {
                    tracing::debug!("Found {} links via structured API", links.len());
                    return Ok(links);
                }
                Ok(_) => {
                    tracing::debug!("Structured API found nothing for {}, scraping", query);
                }
                Err(e) => {
                    tracing::warn!("Structured API error, falling back to scraping: {}", e);
                }
            }
        }

        self.scraper.search(query).await
    }

    fn name(&self) -> &'static str {
        if self.api.is_some() {
            "structured-api+scraping"
        } else {
            "scraping"
        }
    }
}
