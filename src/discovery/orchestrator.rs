//! Discovery orchestrator - main run loop
//!
//! The orchestrator owns the query plan, the source fetcher and a handle to
//! the link store. A run walks the plan in order:
//! 1. Dispatch the query to the fetcher
//! 2. Merge the links into the store and report what is new
//! 3. Persist every few queries
//! 4. Sleep a randomized interval, waking early on cancellation
//!
//! Fetch failures never leave the run loop. The only run-level failure is
//! the final persist.

use crate::config::{ApiCredentials, Config, PacingConfig};
use crate::discovery::events::{EventSink, ProgressEvent, RunProgress};
use crate::discovery::lock_store;
use crate::discovery::pacing::{jitter_delay, sleep_or_cancel};
use crate::fetch::{ProviderChain, ScrapingProvider, SearchProvider, SourceFetcher, StructuredApiProvider};
use crate::output::RunSummary;
use crate::query::{Query, QueryGenerator};
use crate::state::RunState;
use crate::store::SharedLinkStore;
use crate::ScoutError;
use chrono::Utc;
use tokio_util::sync::CancellationToken;

/// Default number of queries per run
pub const DEFAULT_MAX_QUERIES: usize = 50;

/// Parameters for a single run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunParams {
    /// Upper bound on queries dispatched
    pub max_queries: usize,

    /// Number of generated queries to skip
    pub start_at: usize,
}

impl Default for RunParams {
    fn default() -> Self {
        Self {
            max_queries: DEFAULT_MAX_QUERIES,
            start_at: 0,
        }
    }
}

/// Main discovery orchestrator
pub struct Orchestrator<P = ProviderChain> {
    store: SharedLinkStore,
    generator: QueryGenerator,
    fetcher: SourceFetcher<P>,
    checkpoint_every: usize,
    pacing: PacingConfig,
    events: EventSink,
    cancel: CancellationToken,
    state: RunState,
}

impl Orchestrator<ProviderChain> {
    /// Creates an orchestrator with the real provider chain
    ///
    /// # Arguments
    ///
    /// * `config` - Validated configuration
    /// * `store` - Link store shared with the caller
    /// * `credentials` - API credentials when the structured API was requested
    /// * `events` - Sink for progress events
    ///
    /// # Returns
    ///
    /// * `Ok(Orchestrator)` - Ready to run
    /// * `Err(ScoutError)` - An HTTP client could not be built
    pub fn new(
        config: &Config,
        store: SharedLinkStore,
        credentials: Option<&ApiCredentials>,
        events: EventSink,
    ) -> Result<Self, ScoutError> {
        let scraper = ScrapingProvider::new(&config.search)?;

        let api = match credentials {
            Some(credentials) => {
                let api = StructuredApiProvider::from_credentials(&config.api, credentials)?;
                if api.is_none() {
                    events.log("API credentials incomplete, using scraping only");
                }
                api
            }
            None => None,
        };

        Ok(Self::with_provider(
            config,
            store,
            ProviderChain::new(api, scraper),
            events,
        ))
    }
}

impl<P: SearchProvider> Orchestrator<P> {
    /// Creates an orchestrator around any search provider
    pub fn with_provider(
        config: &Config,
        store: SharedLinkStore,
        provider: P,
        events: EventSink,
    ) -> Self {
        let search_site = config.search.search_site.as_str();

        Self {
            store,
            generator: QueryGenerator::new(search_site, &config.queries),
            fetcher: SourceFetcher::new(provider, search_site, &config.queries, &config.pacing),
            checkpoint_every: config.pacing.checkpoint_every.max(1),
            pacing: config.pacing.clone(),
            events,
            cancel: CancellationToken::new(),
            state: RunState::Idle,
        }
    }

    /// Returns a token that stops the run when cancelled
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Returns a handle to the link store
    pub fn store(&self) -> SharedLinkStore {
        self.store.clone()
    }

    /// Returns the current run state
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Returns the query generator driving this orchestrator
    pub fn generator(&self) -> &QueryGenerator {
        &self.generator
    }

    /// Runs the discovery loop
    ///
    /// Processes generated queries from `params.start_at` onward, at most
    /// `params.max_queries` of them. Cancellation lets the current query
    /// finish, dispatches nothing more, and still persists the store.
    ///
    /// # Errors
    ///
    /// * `ScoutError::InvalidTransition` - The orchestrator already ran
    /// * `ScoutError::Store` - The final persist failed
    pub async fn run(&mut self, params: &RunParams) -> Result<RunSummary, ScoutError> {
        self.transition(RunState::Running)?;
        let started_at = Utc::now();

        let generated = self.generator.len();
        let start = params.start_at.min(generated);
        let plan: Vec<Query> = self
            .generator
            .iter()
            .skip(start)
            .take(params.max_queries)
            .collect();
        let total = plan.len();

        tracing::info!(
            "Starting discovery: {} of {} queries from index {} via {}",
            total,
            generated,
            start,
            self.fetcher.provider().name()
        );
        self.events.log(format!(
            "Running {} queries ({} generated, starting at {})",
            total, generated, start
        ));

        let mut attempted = 0;
        let mut new_links = 0;

        for (i, query) in plan.iter().enumerate() {
            if self.cancel.is_cancelled() {
                break;
            }

            let index = i + 1;
            self.events.log(format!("[{}/{}] {}", index, total, query));

            let outcome = self.fetcher.fetch(query, &self.events, &self.cancel).await;
            attempted += 1;

            let (fresh, total_links) = {
                let mut store = lock_store(&self.store);
                let fresh = store.merge(outcome.links);
                (fresh, store.len())
            };
            new_links += fresh.len();

            tracing::debug!(
                "Query {} done: {} new, {} total, {} failed searches",
                index,
                fresh.len(),
                total_links,
                outcome.failures
            );

            self.events.emit(ProgressEvent::Progress(RunProgress {
                index,
                total,
                label: query.to_string(),
                new_links: fresh.len(),
                total_links,
            }));
            if !fresh.is_empty() {
                self.events
                    .emit(ProgressEvent::NewLinks(fresh.into_iter().collect()));
            }

            if index % self.checkpoint_every == 0 {
                self.checkpoint();
            }

            if index == total {
                break;
            }

            if !sleep_or_cancel(jitter_delay(&self.pacing), &self.cancel).await {
                self.events
                    .log("Cancellation requested, stopping before the next query");
                break;
            }
        }

        let cancelled = self.cancel.is_cancelled() && attempted < total;
        self.finish(FinishContext {
            cancelled,
            generated,
            start,
            total,
            attempted,
            new_links,
            started_at,
        })
    }

    /// Persists mid-run; failures are logged and the run continues
    fn checkpoint(&self) {
        let store = lock_store(&self.store);
        match store.persist() {
            Ok(()) => {
                self.events.emit(ProgressEvent::Checkpoint {
                    total_links: store.len(),
                });
            }
            Err(e) => {
                tracing::warn!("Checkpoint failed: {}", e);
                self.events.log(format!("Checkpoint failed: {}", e));
            }
        }
    }

    fn finish(&mut self, ctx: FinishContext) -> Result<RunSummary, ScoutError> {
        let (persisted, total_links) = {
            let store = lock_store(&self.store);
            (store.persist(), store.len())
        };

        if let Err(e) = persisted {
            tracing::error!("Final persist failed: {}", e);
            self.transition(RunState::Failed)?;
            self.events.emit(ProgressEvent::Failed {
                reason: e.to_string(),
            });
            return Err(e.into());
        }

        let final_state = if ctx.cancelled {
            self.events.emit(ProgressEvent::Cancelled { total_links });
            RunState::Cancelled
        } else {
            self.events.emit(ProgressEvent::Completed { total_links });
            RunState::Completed
        };
        self.transition(final_state)?;

        tracing::info!(
            "Run {}: {} of {} queries, {} new links, {} total",
            final_state,
            ctx.attempted,
            ctx.total,
            ctx.new_links,
            total_links
        );

        Ok(RunSummary {
            state: final_state,
            queries_generated: ctx.generated,
            queries_scheduled: ctx.total,
            queries_attempted: ctx.attempted,
            new_links: ctx.new_links,
            total_links,
            next_index: ctx.start + ctx.attempted,
            started_at: ctx.started_at,
            finished_at: Utc::now(),
        })
    }

    fn transition(&mut self, next: RunState) -> Result<(), ScoutError> {
        if !self.state.can_transition_to(next) {
            return Err(ScoutError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        self.state = next;
        Ok(())
    }
}

/// Counters carried from the loop into the final persist
struct FinishContext {
    cancelled: bool,
    generated: usize,
    start: usize,
    total: usize,
    attempted: usize,
    new_links: usize,
    started_at: chrono::DateTime<Utc>,
}
