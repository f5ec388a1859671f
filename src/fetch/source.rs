//! Per-category source fetching
//!
//! Routes a [`Query`] to the right fetch strategy and absorbs every fetch
//! failure: a failed search is logged to the event stream, backed off from
//! when the error calls for it, and counted as finding nothing.

use crate::config::{PacingConfig, QueryConfig};
use crate::discovery::{sleep_or_cancel, EventSink};
use crate::fetch::provider::SearchProvider;
use crate::invite::InviteLink;
use crate::query::{Query, QueryCategory};
use std::collections::HashSet;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Links gathered for one query, plus how many searches failed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchOutcome {
    pub links: HashSet<InviteLink>,
    pub searches: usize,
    pub failures: usize,
}

/// Dispatches queries to the search-site or article-site strategy
#[derive(Debug, Clone)]
pub struct SourceFetcher<P> {
    provider: P,
    search_site: String,
    article_sites: Vec<String>,
    pacing: PacingConfig,
}

impl<P: SearchProvider> SourceFetcher<P> {
    /// Creates a fetcher around a search provider
    pub fn new(provider: P, search_site: &str, queries: &QueryConfig, pacing: &PacingConfig) -> Self {
        Self {
            provider,
            search_site: search_site.to_string(),
            article_sites: queries.article_sites.clone(),
            pacing: pacing.clone(),
        }
    }

    /// Returns the underlying provider
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Runs every search a query calls for
    ///
    /// # Strategy
    ///
    /// | Category | Searches |
    /// |----------|----------|
    /// | SearchSite | One search scoped to the search site |
    /// | ArticleSite | One search per article domain, with a fixed delay between them |
    ///
    /// Never fails. Cancellation shortens delays and backoffs but the query
    /// still runs to completion.
    pub async fn fetch(
        &self,
        query: &Query,
        events: &EventSink,
        cancel: &CancellationToken,
    ) -> FetchOutcome {
        let mut outcome = FetchOutcome::default();

        match query.category() {
            QueryCategory::SearchSite => {
                let scoped = scope_query(query.text(), &self.search_site);
                self.search_once(&scoped, &mut outcome, events, cancel).await;
            }
            QueryCategory::ArticleSite => {
                let delay = Duration::from_millis(self.pacing.article_delay_ms);
                for (i, site) in self.article_sites.iter().enumerate() {
                    if i > 0 {
                        sleep_or_cancel(delay, cancel).await;
                    }
                    events.log(format!("Searching site:{} for: {}", site, query.text()));
                    let scoped = scope_query(query.text(), site);
                    self.search_once(&scoped, &mut outcome, events, cancel).await;
                }
            }
        }

        outcome
    }

    async fn search_once(
        &self,
        scoped: &str,
        outcome: &mut FetchOutcome,
        events: &EventSink,
        cancel: &CancellationToken,
    ) {
        outcome.searches += 1;

        match self.provider.search(scoped).await {
            Ok(links) => {
                events.log(format!(
                    "Found {} invite links via {}",
                    links.len(),
                    self.provider.name()
                ));
                outcome.links.extend(links);
            }
            Err(e) => {
                outcome.failures += 1;
                events.log(format!("Search failed for {}: {}", scoped, e));

                if e.is_rate_limited() {
                    let backoff = Duration::from_millis(self.pacing.rate_limit_backoff_ms);
                    events.log(format!("Rate limited, waiting {}s", backoff.as_secs()));
                    sleep_or_cancel(backoff, cancel).await;
                } else if e.is_timeout() {
                    let backoff = Duration::from_millis(self.pacing.timeout_backoff_ms);
                    events.log(format!("Request timed out, pausing {}s", backoff.as_secs()));
                    sleep_or_cancel(backoff, cancel).await;
                }
            }
        }
    }
}

/// Scopes a query to a site unless it already is
///
/// # Example
///
/// ```
/// use invite_scout::fetch::scope_query;
///
/// assert_eq!(scope_query("nft", "medium.com"), "site:medium.com nft");
/// assert_eq!(scope_query("site:x.com nft", "x.com"), "site:x.com nft");
/// ```
pub fn scope_query(query: &str, site: &str) -> String {
    let scope = format!("site:{}", site);
    if query.contains(&scope) {
        query.to_string()
    } else {
        format!("{} {}", scope, query)
    }
}
