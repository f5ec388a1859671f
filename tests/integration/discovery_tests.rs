//! Integration tests for discovery
//!
//! These tests use wiremock to stand in for the search engine, the
//! structured search API and arbitrary pages, and exercise the fetchers and
//! a full run end-to-end.

use invite_scout::config::{ApiConfig, ApiCredentials, Config, PacingConfig, QueryConfig, SearchConfig};
use invite_scout::discovery::{scrape_pages, EventSink, ProgressEvent, RunParams};
use invite_scout::fetch::{
    ProviderChain, ScrapingProvider, SearchProvider, StructuredApiProvider,
};
use invite_scout::store::LinkStore;
use invite_scout::{FetchError, InviteLink, Orchestrator, RunState};
use std::time::Duration;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const RESULTS_PAGE: &str = r#"
<html><body>
  <div id="search">
    <div class="g">
      <a href="/url?q=https://discord.gg/abc123&amp;sa=U">Join our server</a>
      <span class="st">Community chat at DISCORD.COM/invite/XyZ789 for holders</span>
    </div>
    <div class="result">
      <a href="https://x.com/someone/status/1">Post</a>
      <div class="snippet">alpha drops in discord.gg/alpha-1!</div>
    </div>
  </div>
</body></html>
"#;

fn search_config(server: &MockServer) -> SearchConfig {
    SearchConfig {
        base_url: format!("{}/search", server.uri()),
        request_timeout_ms: 2_000,
        ..SearchConfig::default()
    }
}

fn link(raw: &str) -> InviteLink {
    InviteLink::parse(raw).unwrap()
}

#[tokio::test]
async fn test_scraping_provider_extracts_from_results_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "site:x.com \"discord.gg/\" nft"))
        .and(query_param("num", "100"))
        .and(query_param("hl", "en"))
        .respond_with(ResponseTemplate::new(200).set_body_string(RESULTS_PAGE))
        .expect(1)
        .mount(&server)
        .await;

    let provider = ScrapingProvider::new(&search_config(&server)).unwrap();
    let links = provider.search("site:x.com \"discord.gg/\" nft").await.unwrap();

    assert_eq!(links.len(), 3);
    assert!(links.contains(&link("https://discord.gg/abc123")));
    assert!(links.contains(&link("https://discord.gg/XyZ789")));
    assert!(links.contains(&link("https://discord.gg/alpha-1")));
}

#[tokio::test]
async fn test_rate_limit_is_classified() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let provider = ScrapingProvider::new(&search_config(&server)).unwrap();
    let err = provider.search("anything").await.unwrap_err();

    assert!(err.is_rate_limited());
    assert!(matches!(err, FetchError::RateLimited { .. }));
}

#[tokio::test]
async fn test_server_error_is_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let provider = ScrapingProvider::new(&search_config(&server)).unwrap();
    let err = provider.search("anything").await.unwrap_err();

    assert!(matches!(err, FetchError::Status { status_code: 503, .. }));
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(RESULTS_PAGE)
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let config = SearchConfig {
        request_timeout_ms: 200,
        ..search_config(&server)
    };
    let provider = ScrapingProvider::new(&config).unwrap();
    let err = provider.search("anything").await.unwrap_err();

    assert!(err.is_timeout());
}

#[tokio::test]
async fn test_structured_api_results() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/customsearch/v1"))
        .and(query_param("key", "test-key"))
        .and(query_param("cx", "test-cx"))
        .and(query_param("num", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "items": [
                {
                    "title": "NFT community discord.gg/TitleCode",
                    "link": "https://discord.com/invite/LinkCode",
                    "snippet": "Join at discord.gg/snippetcode today"
                },
                { "title": "No invite here" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api_config = ApiConfig {
        endpoint: format!("{}/customsearch/v1", server.uri()),
        results_per_call: 50,
        ..ApiConfig::default()
    };
    let credentials = ApiCredentials::new("test-key", "test-cx");
    let api = StructuredApiProvider::from_credentials(&api_config, &credentials)
        .unwrap()
        .unwrap();

    let links = api.search("\"discord.gg/\" nft").await.unwrap();

    assert_eq!(links.len(), 3);
    assert!(links.contains(&link("https://discord.gg/TitleCode")));
    assert!(links.contains(&link("https://discord.gg/LinkCode")));
    assert!(links.contains(&link("https://discord.gg/snippetcode")));
}

#[tokio::test]
async fn test_chain_falls_back_to_scraping_on_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/customsearch/v1"))
        .respond_with(ResponseTemplate::new(403).set_body_string("quota exceeded"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string(RESULTS_PAGE))
        .expect(1)
        .mount(&server)
        .await;

    let api_config = ApiConfig {
        endpoint: format!("{}/customsearch/v1", server.uri()),
        ..ApiConfig::default()
    };
    let api = StructuredApiProvider::from_credentials(
        &api_config,
        &ApiCredentials::new("key", "cx"),
    )
    .unwrap();
    let scraper = ScrapingProvider::new(&search_config(&server)).unwrap();
    let chain = ProviderChain::new(api, scraper);

    assert!(chain.has_api());
    let links = chain.search("site:x.com nft").await.unwrap();
    assert_eq!(links.len(), 3);
}

#[tokio::test]
async fn test_scrape_pages_merges_and_persists() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/thread"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><head><meta name="description" content="see https://discord.gg/metacode"></head>
            <body><p>Join us at discord.gg/pagecode</p>
            <a href="https://discord.com/invite/Other1">invite</a></body></html>"#,
        ))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("invite_link.txt");
    std::fs::write(&path, "https://discord.gg/pagecode\n").unwrap();
    let store = LinkStore::load(&path).into_shared();

    let scraper = ScrapingProvider::new(&search_config(&server)).unwrap();
    let urls = vec![
        format!("{}/gone", server.uri()),
        format!("{}/thread", server.uri()),
    ];

    let new_links = scrape_pages(
        &scraper,
        &store,
        &urls,
        &PacingConfig::immediate(),
        &EventSink::disabled(),
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(new_links, 2);
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "https://discord.gg/Other1\nhttps://discord.gg/metacode\nhttps://discord.gg/pagecode\n"
    );
}

#[tokio::test]
async fn test_full_run_persists_links() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string(RESULTS_PAGE))
        .expect(4)
        .mount(&server)
        .await;

    let config = Config {
        search: search_config(&server),
        api: ApiConfig::default(),
        pacing: PacingConfig::immediate(),
        queries: QueryConfig {
            base_phrases: vec!["\"discord.gg/\" nft".to_string(), "\"discord.gg/\" dao".to_string()],
            combined_phrases: vec![],
            article_sites: vec!["medium.com".to_string()],
        },
    };

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("invite_link.txt");
    std::fs::write(&path, "https://discord.gg/abc123\n").unwrap();
    let store = LinkStore::load(&path).into_shared();

    let (events, mut rx) = EventSink::channel();
    let mut orchestrator = Orchestrator::new(&config, store.clone(), None, events).unwrap();
    let summary = orchestrator.run(&RunParams::default()).await.unwrap();

    assert_eq!(summary.state, RunState::Completed);
    assert_eq!(summary.queries_scheduled, 4);
    assert_eq!(summary.queries_attempted, 4);
    assert_eq!(summary.new_links, 2);
    assert_eq!(summary.total_links, 3);

    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "https://discord.gg/XyZ789\nhttps://discord.gg/abc123\nhttps://discord.gg/alpha-1\n"
    );

    let mut progress = 0;
    let mut last = None;
    while let Ok(event) = rx.try_recv() {
        if matches!(event, ProgressEvent::Progress(_)) {
            progress += 1;
        }
        last = Some(event);
    }
    assert_eq!(progress, 4);
    assert_eq!(last, Some(ProgressEvent::Completed { total_links: 3 }));
}
