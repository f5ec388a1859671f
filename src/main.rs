//! Invite-Scout main entry point
//!
//! This is the command-line interface for the Invite-Scout link harvester.

use anyhow::Context;
use clap::Parser;
use invite_scout::config::{
    load_config_with_hash, load_credentials, validate, ApiCredentials, Config,
    DEFAULT_CREDENTIALS_PATH,
};
use invite_scout::discovery::{scrape_pages, EventSink, ProgressEvent, RunParams};
use invite_scout::fetch::ScrapingProvider;
use invite_scout::output::{
    generate_markdown_summary, load_statistics, print_statistics, print_summary,
};
use invite_scout::store::{LinkStore, DEFAULT_OUTPUT_PATH};
use invite_scout::{InviteLink, Orchestrator};
use std::path::PathBuf;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Invite-Scout: a Discord invite link harvester
///
/// Invite-Scout runs a fixed plan of search queries, extracts Discord invite
/// links from the results, and keeps a deduplicated link file up to date.
/// Press Ctrl-C to stop after the current query; found links are saved.
#[derive(Parser, Debug)]
#[command(name = "invite-scout")]
#[command(version = "1.0.0")]
#[command(about = "Discovers Discord invite links via web search", long_about = None)]
struct Cli {
    /// Link file to read and update
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_OUTPUT_PATH)]
    output: PathBuf,

    /// Maximum number of queries to run
    #[arg(short = 'n', long, default_value_t = 50)]
    max_queries: usize,

    /// Skip this many generated queries (resume an interrupted run)
    #[arg(long, value_name = "INDEX", default_value_t = 0)]
    start_at: usize,

    /// Query the structured search API before scraping
    #[arg(long)]
    use_api: bool,

    /// API key for the structured search API (overrides the credential file)
    #[arg(long, value_name = "KEY")]
    api_key: Option<String>,

    /// Search engine ID for the structured search API (overrides the credential file)
    #[arg(long, value_name = "ID")]
    search_engine_id: Option<String>,

    /// JSON credential file for the structured search API
    #[arg(long, value_name = "FILE", default_value = DEFAULT_CREDENTIALS_PATH)]
    credentials: PathBuf,

    /// Path to an optional TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Write a markdown report of the run to this file
    #[arg(long, value_name = "FILE")]
    summary: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show the query plan without searching
    #[arg(long, conflicts_with_all = ["stats", "scrape_url"])]
    dry_run: bool,

    /// Show statistics for the link file and exit
    #[arg(long, conflicts_with_all = ["dry_run", "scrape_url"])]
    stats: bool,

    /// Scrape invite links from this page instead of searching (repeatable)
    #[arg(long, value_name = "URL", conflicts_with_all = ["dry_run", "stats"])]
    scrape_url: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let (config, config_hash) = load_configuration(cli.config.as_deref())?;

    // Handle different modes
    if cli.dry_run {
        handle_dry_run(&cli, &config);
    } else if cli.stats {
        handle_stats(&cli);
    } else if !cli.scrape_url.is_empty() {
        handle_scrape(&cli, &config).await?;
    } else {
        handle_run(&cli, config, config_hash).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("invite_scout=info,warn"),
            1 => EnvFilter::new("invite_scout=debug,info"),
            2 => EnvFilter::new("invite_scout=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the configuration file if one was given, otherwise the defaults
fn load_configuration(path: Option<&std::path::Path>) -> anyhow::Result<(Config, Option<String>)> {
    match path {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            Ok((config, Some(hash)))
        }
        None => {
            let config = Config::default();
            validate(&config).context("Built-in configuration is invalid")?;
            Ok((config, None))
        }
    }
}

/// Resolves API credentials when the structured API was requested
fn resolve_credentials(cli: &Cli) -> Option<ApiCredentials> {
    if !cli.use_api {
        return None;
    }

    let credentials = load_credentials(&cli.credentials)
        .with_overrides(cli.api_key.clone(), cli.search_engine_id.clone());
    Some(credentials)
}

/// Handles the --dry-run mode: validates config and shows the query plan
fn handle_dry_run(cli: &Cli, config: &Config) {
    use invite_scout::QueryGenerator;

    println!("=== Invite-Scout Dry Run ===\n");

    println!("Search:");
    println!("  Engine: {}", config.search.base_url);
    println!("  Search site: {}", config.search.search_site);
    println!("  Results per page: {}", config.search.results_per_page);
    println!(
        "  Structured API: {}",
        if cli.use_api { "requested" } else { "off" }
    );

    println!("\nPacing:");
    println!(
        "  Jitter: {}-{}ms",
        config.pacing.jitter_min_ms, config.pacing.jitter_max_ms
    );
    println!("  Article delay: {}ms", config.pacing.article_delay_ms);
    println!("  Checkpoint every: {} queries", config.pacing.checkpoint_every);

    println!("\nArticle Sites ({}):", config.queries.article_sites.len());
    for site in &config.queries.article_sites {
        println!("  - {}", site);
    }

    let generator = QueryGenerator::new(&config.search.search_site, &config.queries);
    let plan: Vec<_> = generator
        .iter()
        .enumerate()
        .skip(cli.start_at)
        .take(cli.max_queries)
        .collect();

    println!(
        "\nQuery Plan ({} of {} generated):",
        plan.len(),
        generator.len()
    );
    for (index, query) in &plan {
        println!("  {:>3}. {}", index, query);
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would write links to {}", cli.output.display());
}

/// Handles the --stats mode: shows statistics for the link file
fn handle_stats(cli: &Cli) {
    let store = LinkStore::load(&cli.output);
    print_statistics(&load_statistics(&store));
}

/// Handles the --scrape-url mode: scrapes the given pages directly
async fn handle_scrape(cli: &Cli, config: &Config) -> anyhow::Result<()> {
    let scraper = ScrapingProvider::new(&config.search)?;
    let store = LinkStore::load(&cli.output).into_shared();
    let (events, rx) = EventSink::channel();
    let cancel = CancellationToken::new();

    let worker = {
        let store = store.clone();
        let urls = cli.scrape_url.clone();
        let pacing = config.pacing.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move {
            scrape_pages(&scraper, &store, &urls, &pacing, &events, &cancel).await
        })
    };

    render_events(rx, &cancel).await;

    let new_links = worker
        .await
        .context("Scrape task panicked")?
        .context("Failed to save links")?;
    println!("\n✓ {} new links saved to {}", new_links, cli.output.display());

    Ok(())
}

/// Handles the main discovery run
async fn handle_run(cli: &Cli, config: Config, config_hash: Option<String>) -> anyhow::Result<()> {
    let store = LinkStore::load(&cli.output).into_shared();
    let credentials = resolve_credentials(cli);
    let (events, rx) = EventSink::channel();

    let mut orchestrator = Orchestrator::new(&config, store, credentials.as_ref(), events)?;
    let cancel = orchestrator.cancel_token();
    let params = RunParams {
        max_queries: cli.max_queries,
        start_at: cli.start_at,
    };

    let worker = tokio::spawn(async move { orchestrator.run(&params).await });

    let new_links = render_events(rx, &cancel).await;

    let summary = match worker.await.context("Discovery task panicked")? {
        Ok(summary) => summary,
        Err(e) => {
            tracing::error!("Discovery run failed: {}", e);
            return Err(e).context("Failed to save links");
        }
    };

    println!();
    print_summary(&summary);

    if let Some(path) = &cli.summary {
        generate_markdown_summary(&summary, &new_links, config_hash.as_deref(), path)?;
        println!("✓ Summary exported to: {}", path.display());
    }

    Ok(())
}

/// Prints progress events until the worker drops its sink
///
/// The first Ctrl-C cancels the run; the worker then finishes its current
/// step and saves.
///
/// # Returns
///
/// Every link reported as new, in discovery order
async fn render_events(
    mut rx: UnboundedReceiver<ProgressEvent>,
    cancel: &CancellationToken,
) -> Vec<InviteLink> {
    let mut discovered = Vec::new();
    let mut interrupted = false;

    loop {
        tokio::select! {
            event = rx.recv() => {
                let Some(event) = event else { break };
                if let ProgressEvent::NewLinks(links) = &event {
                    discovered.extend(links.iter().cloned());
                }
                print_event(&event);
            }
            signal = tokio::signal::ctrl_c(), if !interrupted => {
                interrupted = true;
                if let Err(e) = signal {
                    tracing::warn!("Could not listen for Ctrl-C: {}", e);
                    continue;
                }
                println!("\nStopping after the current query, saving links...");
                cancel.cancel();
            }
        }
    }

    discovered
}

fn print_event(event: &ProgressEvent) {
    match event {
        ProgressEvent::Log(line) => println!("{}", line),
        ProgressEvent::Progress(p) => println!(
            "Progress: {}/{} | +{} new | {} total",
            p.index, p.total, p.new_links, p.total_links
        ),
        ProgressEvent::NewLinks(links) => {
            for link in links {
                println!("  + {}", link);
            }
        }
        ProgressEvent::Checkpoint { total_links } => {
            println!("Saved {} links (checkpoint)", total_links)
        }
        ProgressEvent::Completed { total_links } => {
            println!("✓ Done, {} links saved", total_links)
        }
        ProgressEvent::Cancelled { total_links } => {
            println!("Stopped, {} links saved", total_links)
        }
        ProgressEvent::Failed { reason } => eprintln!("✗ Failed to save links: {}", reason),
    }
}
