//! Scheduler for managing the crawl frontier and politeness delay
//!
//! This module handles:
//! - FIFO (breadth-first) frontier management
//! - The visited set that keeps each URL in the frontier at most once
//! - Per-host state: politeness timing and cached robots.txt policy

use crate::state::HostState;
use crate::url::host_key;
use std::collections::{HashMap, HashSet, VecDeque};
use std::time::{Duration, Instant};
use url::Url;

/// Breadth-first queue of URLs awaiting fetch, plus everything ever enqueued
///
/// URLs are compared by their serialized form with the fragment already
/// stripped. The visited set only grows.
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<Url>,
    visited: HashSet<String>,
}

impl Frontier {
    /// Creates a frontier holding only the seed
    pub fn new(seed: Url) -> Self {
        let mut frontier = Self::default();
        frontier.push(seed);
        frontier
    }

    /// Appends a URL unless it was enqueued before
    ///
    /// Returns true if the URL was added.
    pub fn push(&mut self, url: Url) -> bool {
        if !self.visited.insert(url.as_str().to_string()) {
            return false;
        }
        self.queue.push_back(url);
        true
    }

    /// Removes the oldest queued URL
    pub fn pop(&mut self) -> Option<Url> {
        self.queue.pop_front()
    }

    /// Returns the number of URLs waiting to be fetched
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns whether the frontier is empty
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Returns the number of URLs ever enqueued
    pub fn visited_len(&self) -> usize {
        self.visited.len()
    }
}

/// Crawl scheduler
///
/// Hands out URLs in discovery order, one at a time, waiting as needed so
/// consecutive requests to a host are at least `delay` apart.
pub struct Scheduler {
    /// Frontier queue and visited set
    frontier: Frontier,

    /// Per-host state tracking
    host_states: HashMap<String, HostState>,

    /// Minimum time between requests to one host
    delay: Duration,
}

impl Scheduler {
    /// Creates a new scheduler seeded with one URL
    pub fn new(seed: Url, delay: Duration) -> Self {
        Self {
            frontier: Frontier::new(seed),
            host_states: HashMap::new(),
            delay,
        }
    }

    /// Gets the next URL to fetch
    ///
    /// Pops the oldest URL, then sleeps until its host's politeness delay has
    /// elapsed. Returns None once the frontier is empty.
    pub async fn next_url(&mut self) -> Option<Url> {
        let url = self.frontier.pop()?;
        self.wait_for_host(&url).await;
        Some(url)
    }

    /// Sleeps until the URL's host may receive another request
    pub async fn wait_for_host(&self, url: &Url) {
        if let Some(wait) = self.time_until_ready(url, Instant::now()) {
            tracing::trace!("Waiting {:?} before requesting {}", wait, url);
            tokio::time::sleep(wait).await;
        }
    }

    fn time_until_ready(&self, url: &Url, now: Instant) -> Option<Duration> {
        let key = host_key(url)?;
        self.host_states
            .get(&key)?
            .time_until_next_request(self.delay, now)
    }

    /// Adds a URL to the back of the frontier if it has not been seen
    pub fn add_to_frontier(&mut self, url: Url) -> bool {
        self.frontier.push(url)
    }

    /// Records that a page request was made to the URL's host
    pub fn record_request(&mut self, url: &Url) {
        if let Some(state) = self.host_state_mut(url) {
            state.record_request(Instant::now());
        }
    }

    /// Gets the host state for a URL's host
    pub fn host_state(&self, url: &Url) -> Option<&HostState> {
        self.host_states.get(&host_key(url)?)
    }

    /// Gets mutable host state for a URL's host, creating it if needed
    pub fn host_state_mut(&mut self, url: &Url) -> Option<&mut HostState> {
        let key = host_key(url)?;
        Some(self.host_states.entry(key).or_default())
    }

    /// Returns the number of URLs in the frontier
    pub fn frontier_size(&self) -> usize {
        self.frontier.len()
    }

    /// Returns the number of distinct URLs enqueued during this crawl
    pub fn visited_len(&self) -> usize {
        self.frontier.visited_len()
    }
}
