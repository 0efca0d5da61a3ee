//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop that coordinates all aspects of
//! the crawling process, including:
//! - Validating the seed and resolving the scope
//! - Managing the frontier queue
//! - Coordinating robots checks, fetching, normalization and storage
//! - Growing the frontier from in-scope links
//! - Honoring the page limit and cancellation

use crate::config::Config;
use crate::crawler::parser::extract_links;
use crate::crawler::request::CrawlRequest;
use crate::crawler::scheduler::Scheduler;
use crate::crawler::{build_http_client, fetch_url, FetchOutcome, RawPage, MAX_REDIRECTS};
use crate::normalize::{MarkdownNormalizer, Normalizer};
use crate::output::{with_source_header, CrawlReport, FileStore, PageFailure, PageResult, Store, StoreError};
use crate::robots::{fetch_robots, is_allowed};
use crate::state::CrawlState;
use crate::url::{derive_disambiguated_path, derive_path, in_scope, normalize_url, ScopeMode};
use crate::{FetchError, ScrapeError};
use reqwest::Client;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use url::Url;

/// Requests early termination of a running crawl
///
/// Cancellation is checked before each page; a fetch already in flight is
/// allowed to finish. A cancelled crawl still completes normally with the
/// pages gathered so far.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Main crawler structure
///
/// One `Crawler` runs one crawl. Frontier and visited state live only for the
/// duration of [`Crawler::run`].
pub struct Crawler {
    config: Arc<Config>,
    client: Client,
    normalizer: Box<dyn Normalizer>,
    store: Box<dyn Store>,
    cancel: CancelHandle,
    state: CrawlState,
}

impl Crawler {
    /// Creates a new crawler instance
    ///
    /// Uses [`MarkdownNormalizer`] and a [`FileStore`] rooted at
    /// `config.output.root` unless replaced with [`Crawler::with_normalizer`]
    /// or [`Crawler::with_store`].
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - Successfully created crawler
    /// * `Err(ScrapeError)` - The HTTP client could not be built
    pub fn new(config: Config) -> Result<Self, ScrapeError> {
        let client = build_http_client(&config)?;
        let store = FileStore::new(config.output.root.clone());

        Ok(Self {
            config: Arc::new(config),
            client,
            normalizer: Box::new(MarkdownNormalizer::new()),
            store: Box::new(store),
            cancel: CancelHandle::default(),
            state: CrawlState::Idle,
        })
    }

    /// Replaces the content normalizer
    pub fn with_normalizer(mut self, normalizer: impl Normalizer + 'static) -> Self {
        self.normalizer = Box::new(normalizer);
        self
    }

    /// Replaces the document store
    pub fn with_store(mut self, store: impl Store + 'static) -> Self {
        self.store = Box::new(store);
        self
    }

    /// Returns a handle that can stop the crawl from another task
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Returns the current lifecycle state
    pub fn state(&self) -> CrawlState {
        self.state
    }

    /// Runs the crawl to completion
    ///
    /// The crawl loop:
    /// 1. Stops when the frontier is empty, the page limit is reached, or
    ///    cancellation was requested
    /// 2. Dequeues the oldest URL and waits out the politeness delay
    /// 3. Checks robots.txt, then fetches the page
    /// 4. Normalizes, stores and records the page
    /// 5. Enqueues unseen in-scope links while the limit allows more pages
    ///
    /// Per-page failures are logged and recorded in the report; they never
    /// end the crawl.
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlReport)` - Crawl completed, results in fetch order
    /// * `Err(ScrapeError)` - Crawl aborted (invalid seed, unwritable output
    ///   root) or this crawler already ran
    pub async fn run(&mut self, request: CrawlRequest) -> Result<CrawlReport, ScrapeError> {
        if self.state != CrawlState::Idle {
            return Err(ScrapeError::InvalidTransition {
                from: self.state,
                to: CrawlState::Running,
            });
        }

        let seed = match normalize_url(&request.seed) {
            Ok(seed) => seed,
            Err(e) => return Err(self.abort(e.into())),
        };

        if let Err(StoreError::Io { path, source }) = self.store.prepare() {
            return Err(self.abort(ScrapeError::OutputRoot { path, source }));
        }

        let scope = request.scope.resolve(&seed);
        self.transition(CrawlState::Running)?;
        tracing::info!(
            "Starting crawl of {} (scope: {}, page limit: {})",
            seed,
            scope,
            request.page_limit
        );

        let mut scheduler = Scheduler::new(seed.clone(), self.config.crawler.delay());
        let mut report = CrawlReport::new(scope);
        let mut written: HashMap<PathBuf, Url> = HashMap::new();

        loop {
            if request.page_limit.is_reached(report.pages_fetched()) {
                tracing::info!("Page limit of {} reached", request.page_limit);
                break;
            }

            if self.cancel.is_cancelled() {
                tracing::info!("Crawl cancelled");
                report.cancelled = true;
                break;
            }

            let Some(url) = scheduler.next_url().await else {
                tracing::info!("Frontier is empty, crawl complete");
                break;
            };

            tracing::debug!("Processing URL: {}", url);

            let page = match self.fetch_page(&mut scheduler, &seed, scope, &url).await {
                Ok(page) => page,
                Err(error) => {
                    tracing::warn!("Skipping {}: {}", url, error);
                    report.failures.push(PageFailure { url, error });
                    continue;
                }
            };

            let result = self.build_result(&url, &page);
            self.persist(&result, &mut written, &mut report);
            report.results.push(result);

            if scope.follows_links() && !request.page_limit.is_reached(report.pages_fetched()) {
                let mut added = 0;
                for link in extract_links(&page.body, &page.final_url) {
                    if in_scope(scope, &seed, &link) && scheduler.add_to_frontier(link) {
                        added += 1;
                    }
                }
                tracing::debug!(
                    "Enqueued {} new links from {} ({} in frontier)",
                    added,
                    url,
                    scheduler.frontier_size()
                );
            }
        }

        self.transition(CrawlState::Completed)?;
        report.state = self.state;

        tracing::info!(
            "Crawl completed: {} pages fetched, {} failed, {} URLs discovered",
            report.pages_fetched(),
            report.failures.len(),
            scheduler.visited_len()
        );

        Ok(report)
    }

    /// Fetches a page, following redirects one hop at a time
    ///
    /// Every hop is checked before it is requested:
    /// 1. Redirect targets must stay in scope (`Single` only requires the
    ///    seed's host, since it never follows links)
    /// 2. The target must be allowed by its host's robots.txt
    /// 3. The host's politeness delay is honored
    ///
    /// A target already seen in this chain is a loop. More than
    /// [`MAX_REDIRECTS`] hops is an error.
    async fn fetch_page(
        &self,
        scheduler: &mut Scheduler,
        seed: &Url,
        scope: ScopeMode,
        url: &Url,
    ) -> Result<RawPage, FetchError> {
        let redirect_error = |message: String| FetchError::Redirect {
            url: url.to_string(),
            message,
        };

        let hop_scope = match scope {
            ScopeMode::Single => ScopeMode::Domain,
            other => other,
        };

        let mut target = url.clone();
        let mut chain: HashSet<String> = HashSet::new();
        chain.insert(target.as_str().to_string());

        for hop in 0..=MAX_REDIRECTS {
            if hop > 0 {
                if !in_scope(hop_scope, seed, &target) {
                    return Err(redirect_error(format!("target {} is out of scope", target)));
                }
                scheduler.wait_for_host(&target).await;
            }

            self.check_robots(scheduler, &target).await?;
            scheduler.record_request(&target);

            match fetch_url(&self.client, &target).await? {
                FetchOutcome::Page(page) => return Ok(page),
                FetchOutcome::Redirect { location } => {
                    tracing::debug!("{} redirects to {}", target, location);
                    if !chain.insert(location.as_str().to_string()) {
                        return Err(redirect_error(format!("redirect loop at {}", location)));
                    }
                    target = location;
                }
            }
        }

        Err(redirect_error(format!("more than {} redirects", MAX_REDIRECTS)))
    }

    /// Fetches the host's robots.txt on first contact, then checks the URL
    async fn check_robots(&self, scheduler: &mut Scheduler, url: &Url) -> Result<(), FetchError> {
        let needs_robots = scheduler
            .host_state(url)
            .map_or(true, |state| state.robots.is_none());

        if needs_robots {
            let robots = fetch_robots(&self.client, url).await;
            if let Some(state) = scheduler.host_state_mut(url) {
                state.update_robots(robots);
            }
        }

        let allowed = scheduler
            .host_state(url)
            .and_then(|state| state.robots.as_ref())
            .map_or(true, |robots| {
                is_allowed(robots, url.as_str(), &self.config.user_agent.crawler_name)
            });

        if allowed {
            Ok(())
        } else {
            Err(FetchError::Disallowed {
                url: url.to_string(),
            })
        }
    }

    /// Normalizes a fetched page and derives its output path
    fn build_result(&self, url: &Url, page: &RawPage) -> PageResult {
        let content = match self.normalizer.normalize(&page.body, url) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("Failed to normalize {}: {}; storing empty content", url, e);
                String::new()
            }
        };

        let relative_path = if self.config.output.disambiguate_collisions {
            derive_disambiguated_path(url)
        } else {
            derive_path(url)
        };

        PageResult {
            url: url.clone(),
            relative_path,
            content,
        }
    }

    /// Writes a page's document; failures are recorded, not propagated
    fn persist(
        &self,
        result: &PageResult,
        written: &mut HashMap<PathBuf, Url>,
        report: &mut CrawlReport,
    ) {
        if let Some(previous) = written.insert(result.relative_path.clone(), result.url.clone()) {
            tracing::warn!(
                "{} and {} both map to {}; the later page overwrites the earlier one",
                previous,
                result.url,
                result.relative_path.display()
            );
        }

        let document = if self.config.output.source_header {
            with_source_header(result.url.as_str(), &result.content)
        } else {
            result.content.clone()
        };

        match self.store.store(&result.relative_path, &document) {
            Ok(()) => tracing::info!(
                "Scraped and stored: {} -> {}",
                result.url,
                result.relative_path.display()
            ),
            Err(e) => {
                tracing::warn!("Failed to store {}: {}", result.url, e);
                report.store_failures.push(result.url.clone());
            }
        }
    }

    fn transition(&mut self, next: CrawlState) -> Result<(), ScrapeError> {
        if !self.state.can_transition_to(next) {
            return Err(ScrapeError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        tracing::trace!("Crawl state {} -> {}", self.state, next);
        self.state = next;
        Ok(())
    }

    /// Moves to `Aborted` and hands the fatal error back to the caller
    fn abort(&mut self, error: ScrapeError) -> ScrapeError {
        tracing::error!("Crawl aborted: {}", error);
        if let Err(e) = self.transition(CrawlState::Aborted) {
            tracing::debug!("{}", e);
        }
        error
    }
}
