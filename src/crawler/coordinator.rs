//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the worker pool that drives a crawl:
//! - Seeding the work queue with the canonical seed URL
//! - Claiming, fetching, analyzing and expanding each work item
//! - Feeding completions to the completion detector
//! - Shutting the pool down on completion or cancellation

use crate::config::{validate, CrawlConfig};
use crate::crawler::analyzer::{PageProcessor, PatternProcessor};
use crate::crawler::completion::{self, CompletionSender};
use crate::crawler::fetcher::{FetchedPage, HttpClient};
use crate::crawler::scheduler::{pace, WorkItem, WorkQueue};
use crate::state::{PageResult, VisitedStore, WorkState};
use crate::url::{extract_authority, normalize, parse_seed};
use crate::{CrawlError, UrlError};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Everything a finished (or cancelled) crawl hands to the reporter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlReport {
    /// Canonical seed URL
    pub seed: String,

    /// Authority every visited URL shares
    pub host: String,

    pub max_depth: u32,

    /// Visited store contents, ordered by URL
    pub pages: BTreeMap<String, PageResult>,

    /// Work items ever enqueued, the seed included
    pub items_produced: usize,

    /// Work items a worker finished
    pub items_completed: usize,

    /// Items whose fetch failed
    pub items_failed: usize,

    pub elapsed: Duration,

    /// True if the run stopped before every item completed
    pub cancelled: bool,
}

/// Per-worker tallies, summed after the pool is joined
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct WorkerStats {
    processed: usize,
    fetched: usize,
    failed: usize,
    duplicates: usize,
    pruned: usize,
}

impl WorkerStats {
    fn record(&mut self, state: WorkState) {
        self.processed += 1;
        match state {
            WorkState::Analyzed | WorkState::Expanded => self.fetched += 1,
            WorkState::Failed => self.failed += 1,
            WorkState::Duplicate => self.duplicates += 1,
            WorkState::DepthExceeded => self.pruned += 1,
            _ => {}
        }
    }

    fn merge(&mut self, other: WorkerStats) {
        self.processed += other.processed;
        self.fetched += other.fetched;
        self.failed += other.failed;
        self.duplicates += other.duplicates;
        self.pruned += other.pruned;
    }
}

/// Terminal state of one work item plus the links it hands back to the queue
#[derive(Debug)]
struct ItemOutcome {
    state: WorkState,
    links: Vec<String>,
}

impl ItemOutcome {
    fn finished(state: WorkState) -> Self {
        Self {
            state,
            links: Vec::new(),
        }
    }
}

/// State shared by every worker of one run
struct CrawlContext {
    config: Arc<CrawlConfig>,
    client: Arc<dyn HttpClient>,
    processor: Arc<dyn PageProcessor>,
    host: String,
    visited: Arc<VisitedStore>,
    queue: WorkQueue,
}

/// Main crawler structure
///
/// A `Crawler` is built once per run from an immutable configuration and
/// consumed by [`Crawler::run`].
pub struct Crawler {
    config: Arc<CrawlConfig>,
    client: Arc<dyn HttpClient>,
    processor: Arc<dyn PageProcessor>,
    seed: String,
    host: String,
    visited: Arc<VisitedStore>,
}

impl Crawler {
    /// Creates a new crawler for `seed`
    ///
    /// # Arguments
    ///
    /// * `seed` - The seed URL; `https://` is assumed when no scheme is given
    /// * `client` - The HTTP capability used for every GET
    /// * `config` - The crawl configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - Ready to run
    /// * `Err(CrawlError)` - Invalid configuration or seed URL
    pub fn new(
        seed: &str,
        client: Arc<dyn HttpClient>,
        config: CrawlConfig,
    ) -> Result<Self, CrawlError> {
        validate(&config)?;

        let url = parse_seed(seed)?;
        let host = extract_authority(&url).ok_or(UrlError::MissingHost)?;
        let seed = normalize(url.as_str(), &host)?;

        Ok(Self {
            config: Arc::new(config),
            client,
            processor: Arc::new(PatternProcessor),
            seed,
            host,
            visited: Arc::new(VisitedStore::new()),
        })
    }

    /// Replaces the default pattern-based page processor
    pub fn with_processor(mut self, processor: Arc<dyn PageProcessor>) -> Self {
        self.processor = processor;
        self
    }

    /// Canonical seed URL
    pub fn seed(&self) -> &str {
        &self.seed
    }

    /// Crawl host (authority of the seed)
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn config(&self) -> &CrawlConfig {
        &self.config
    }

    /// Runs the crawl to completion
    pub async fn run(self) -> CrawlReport {
        self.run_until_cancelled(CancellationToken::new()).await
    }

    /// Runs the crawl until every item completed or `cancel` fires
    ///
    /// On cancellation in-flight fetches are abandoned, queued items are never
    /// pulled, and the report holds whatever was visited so far.
    pub async fn run_until_cancelled(self, cancel: CancellationToken) -> CrawlReport {
        let started = Instant::now();
        let shutdown = cancel.child_token();

        tracing::info!(
            "Starting crawl of {} with {} worker(s), max depth {}",
            self.seed,
            self.config.parallelism,
            self.config.max_depth
        );

        let context = Arc::new(CrawlContext {
            config: Arc::clone(&self.config),
            client: Arc::clone(&self.client),
            processor: Arc::clone(&self.processor),
            host: self.host.clone(),
            visited: Arc::clone(&self.visited),
            queue: WorkQueue::new(),
        });
        context.queue.push(WorkItem::new(self.seed.clone(), 0));

        let (completions, detector) = completion::channel();
        let workers: Vec<JoinHandle<WorkerStats>> = (0..self.config.parallelism)
            .map(|id| {
                tokio::spawn(run_worker(
                    id,
                    Arc::clone(&context),
                    completions.clone(),
                    shutdown.clone(),
                ))
            })
            .collect();
        drop(completions);

        let summary = detector.wait(&shutdown).await;

        // Idle workers are parked on the queue; release them
        shutdown.cancel();

        let mut stats = WorkerStats::default();
        for handle in workers {
            match handle.await {
                Ok(worker_stats) => stats.merge(worker_stats),
                Err(e) => tracing::error!("Worker task failed: {}", e),
            }
        }

        let report = CrawlReport {
            seed: self.seed,
            host: self.host,
            max_depth: self.config.max_depth,
            pages: self.visited.snapshot(),
            items_produced: summary.produced,
            items_completed: summary.completed,
            items_failed: stats.failed,
            elapsed: started.elapsed(),
            cancelled: summary.cancelled,
        };

        if report.cancelled {
            tracing::warn!(
                "Crawl cancelled after {} of {} items",
                report.items_completed,
                report.items_produced
            );
        }

        tracing::info!(
            "Crawl finished: {} URLs visited, {} fetched, {} failed, {} duplicates, {} pruned in {:?}",
            report.pages.len(),
            stats.fetched,
            stats.failed,
            stats.duplicates,
            stats.pruned,
            report.elapsed
        );

        report
    }
}

/// Drains the shared queue until shutdown
async fn run_worker(
    id: usize,
    context: Arc<CrawlContext>,
    completions: CompletionSender,
    shutdown: CancellationToken,
) -> WorkerStats {
    let mut stats = WorkerStats::default();

    while let Some(item) = context.queue.next(&shutdown).await {
        if !pace(context.config.inter_request_delay, &shutdown).await {
            break;
        }

        let outcome = match context.process(&item, &shutdown).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!("Worker {} failed on {}: {}", id, item.url, e);
                ItemOutcome::finished(WorkState::Failed)
            }
        };
        stats.record(outcome.state);

        // Completion first: the detector must count the fan-out before any
        // child can complete
        completions.complete(outcome.links.len());
        for link in outcome.links {
            context.queue.push(item.child(link));
        }
    }

    tracing::trace!("Worker {} stopped after {} items", id, stats.processed);
    stats
}

impl CrawlContext {
    /// Walks one item through the work state machine
    async fn process(
        &self,
        item: &WorkItem,
        shutdown: &CancellationToken,
    ) -> Result<ItemOutcome, CrawlError> {
        let mut state = WorkState::Queued;

        if !self.visited.try_claim(&item.url) {
            state.transition(WorkState::Duplicate)?;
            tracing::debug!("Skipping {}: already visited", item.url);
            return Ok(ItemOutcome::finished(state));
        }
        state.transition(WorkState::Claimed)?;

        if self.config.exceeds_max_depth(item.depth) {
            state.transition(WorkState::DepthExceeded)?;
            tracing::debug!(
                "Not fetching {}: depth {} exceeds {}",
                item.url,
                item.depth,
                self.config.max_depth
            );
            return Ok(ItemOutcome::finished(state));
        }

        tracing::debug!("Visiting: {} on depth: {}", item.url, item.depth);
        state.transition(WorkState::Fetching)?;

        let fetched = tokio::select! {
            biased;
            _ = shutdown.cancelled() => {
                state.transition(WorkState::Cancelled)?;
                return Ok(ItemOutcome::finished(state));
            }
            result = self.fetch(&item.url) => result,
        };

        let page = match fetched {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!("Failed to fetch {}: {}", item.url, e);
                state.transition(WorkState::Failed)?;
                return Ok(ItemOutcome::finished(state));
            }
        };

        let processed = self.processor.process(&page.body, &self.host);
        self.visited.record(PageResult {
            url: item.url.clone(),
            word_count: processed.counts.words,
            number_count: processed.counts.numbers,
        });
        state.transition(WorkState::Analyzed)?;

        if self.config.exceeds_max_depth(item.depth.saturating_add(1)) {
            return Ok(ItemOutcome::finished(state));
        }

        state.transition(WorkState::Expanded)?;
        Ok(ItemOutcome {
            state,
            links: processed.links.into_iter().collect(),
        })
    }

    /// GET bounded by the configured timeout, whatever the client does
    async fn fetch(&self, url: &str) -> Result<FetchedPage, CrawlError> {
        tokio::time::timeout(self.config.request_timeout, self.client.get(url))
            .await
            .map_err(|_| CrawlError::Timeout {
                url: url.to_string(),
            })?
    }
}
