//! Fetch module for search and page retrieval
//!
//! This module contains everything that talks to the network:
//! - HTTP client construction with browser-like headers
//! - Search result page and arbitrary page scraping
//! - The optional structured search API
//! - The `SearchProvider` seam and the per-category source fetcher

mod api;
mod fetcher;
mod parser;
mod provider;
mod source;

pub use api::{SearchResult, StructuredApiProvider};
pub use fetcher::{build_http_client, fetch_html, FetchedPage};
pub use parser::{extract_from_page, extract_from_search_results, resolve_redirect};
pub use provider::{ProviderChain, ScrapingProvider, SearchProvider};
pub use source::{scope_query, FetchOutcome, SourceFetcher};
