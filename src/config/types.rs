use serde::Deserialize;

/// Default desktop browser identity sent with every request
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Main configuration structure for Invite-Scout
///
/// Every section has defaults, so an empty file (or no file at all) is a
/// complete configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub search: SearchConfig,
    pub api: ApiConfig,
    pub pacing: PacingConfig,
    pub queries: QueryConfig,
}

/// Search engine result page configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SearchConfig {
    /// HTML results endpoint of the search engine
    pub base_url: String,

    /// Number of results requested per page (`num` parameter)
    pub results_per_page: u32,

    /// Interface language (`hl` parameter)
    pub language: String,

    /// Site every search-site query is scoped to
    pub search_site: String,

    /// User-Agent header sent with every request
    pub user_agent: String,

    /// Per-request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.google.com/search".to_string(),
            results_per_page: 100,
            language: "en".to_string(),
            search_site: "x.com".to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout_ms: 15_000,
        }
    }
}

/// Structured search API configuration
///
/// Credentials are not part of this section; they come from the credential
/// file or the command line.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ApiConfig {
    /// Structured query endpoint
    pub endpoint: String,

    /// Results requested per call; the provider caps this at 10
    pub results_per_call: u32,

    /// Per-request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://www.googleapis.com/customsearch/v1".to_string(),
            results_per_call: 10,
            request_timeout_ms: 10_000,
        }
    }
}

/// Request pacing and persistence cadence
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PacingConfig {
    /// Lower bound of the randomized delay between queries (milliseconds)
    pub jitter_min_ms: u64,

    /// Upper bound of the randomized delay between queries (milliseconds)
    pub jitter_max_ms: u64,

    /// Fixed delay between article-site searches (milliseconds)
    pub article_delay_ms: u64,

    /// Backoff after an HTTP 429 (milliseconds)
    pub rate_limit_backoff_ms: u64,

    /// Pause after a request timeout (milliseconds)
    pub timeout_backoff_ms: u64,

    /// Persist the store every N processed queries
    pub checkpoint_every: usize,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            jitter_min_ms: 2_000,
            jitter_max_ms: 5_000,
            article_delay_ms: 2_000,
            rate_limit_backoff_ms: 60_000,
            timeout_backoff_ms: 5_000,
            checkpoint_every: 10,
        }
    }
}

impl PacingConfig {
    /// Pacing with every delay set to zero, for tests and local mocks
    pub fn immediate() -> Self {
        Self {
            jitter_min_ms: 0,
            jitter_max_ms: 0,
            article_delay_ms: 0,
            rate_limit_backoff_ms: 0,
            timeout_backoff_ms: 0,
            checkpoint_every: 10,
        }
    }
}

/// Query generation inputs
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct QueryConfig {
    /// Single-topic phrases, each containing the `"discord.gg/"` marker
    pub base_phrases: Vec<String>,

    /// Compound phrases, run after the base phrases
    pub combined_phrases: Vec<String>,

    /// Article-hosting domains each article query fans out to
    pub article_sites: Vec<String>,
}

impl Default for QueryConfig {
    fn default() -> Self {
        let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();

        Self {
            base_phrases: owned(&[
                r#""discord.gg/" crypto"#,
                r#""discord.gg/" blockchain"#,
                r#""discord.gg/" nft"#,
                r#""discord.gg/" game"#,
                r#""discord.gg/" agent"#,
                r#""discord.gg/" defi"#,
                r#""discord.gg/" web3"#,
                r#""discord.gg/" metaverse"#,
                r#""discord.gg/" dao"#,
                r#""discord.gg/" crypto blockchain nft"#,
                r#""discord.gg/" crypto game agent"#,
            ]),
            combined_phrases: owned(&[
                r#"crypto blockchain nft game agent "discord.gg/""#,
                r#"crypto trading "discord.gg/""#,
                r#"crypto community "discord.gg/""#,
                r#"crypto alpha "discord.gg/""#,
                r#"crypto signals "discord.gg/""#,
                r#"nft collection "discord.gg/""#,
                r#"crypto gaming "discord.gg/""#,
                r#"defi protocol "discord.gg/""#,
                r#"web3 project "discord.gg/""#,
            ]),
            article_sites: owned(&[
                "medium.com",
                "mirror.xyz",
                "substack.com",
                "hackernoon.com",
                "coindesk.com",
                "cointelegraph.com",
            ]),
        }
    }
}
