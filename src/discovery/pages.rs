//! Direct scraping of user-supplied pages
//!
//! Used for one-off URLs such as a forum thread or a blog post. Links found
//! are merged into the same store as search results.

use crate::config::PacingConfig;
use crate::discovery::events::{EventSink, ProgressEvent};
use crate::discovery::lock_store;
use crate::discovery::pacing::sleep_or_cancel;
use crate::fetch::ScrapingProvider;
use crate::store::{SharedLinkStore, StoreResult};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Scrapes each page, merges its invite links and persists the store once
///
/// Pages that fail to load are logged and skipped. Cancellation stops before
/// the next page; the store is persisted either way.
///
/// # Returns
///
/// The number of links that were new to the store
pub async fn scrape_pages(
    scraper: &ScrapingProvider,
    store: &SharedLinkStore,
    urls: &[String],
    pacing: &PacingConfig,
    events: &EventSink,
    cancel: &CancellationToken,
) -> StoreResult<usize> {
    let delay = Duration::from_millis(pacing.article_delay_ms);
    let mut new_links = 0;

    for (i, url) in urls.iter().enumerate() {
        if i > 0 && !sleep_or_cancel(delay, cancel).await {
            events.log("Cancellation requested, skipping remaining pages");
            break;
        }

        events.log(format!("Scraping {}", url));
        let links = match scraper.scrape_page(url).await {
            Ok(links) => links,
            Err(e) => {
                tracing::warn!("Page scrape failed: {}", e);
                events.log(format!("Error scraping {}: {}", url, e));
                continue;
            }
        };

        let fresh = lock_store(store).merge(links);
        events.log(format!("Found {} new links on {}", fresh.len(), url));
        new_links += fresh.len();
        if !fresh.is_empty() {
            events.emit(ProgressEvent::NewLinks(fresh.into_iter().collect()));
        }
    }

    lock_store(store).persist()?;
    Ok(new_links)
}
