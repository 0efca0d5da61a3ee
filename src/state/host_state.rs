use crate::robots::ParsedRobots;
use std::time::{Duration, Instant};

/// Tracks the state of one host during a crawl
///
/// This structure holds what the politeness rules need: when the host was last
/// asked for a page, how many pages it has served, and its robots.txt policy.
#[derive(Debug, Clone, Default)]
pub struct HostState {
    /// Number of page requests made to this host in the current crawl
    pub request_count: u32,

    /// Timestamp of the last page request to this host
    pub last_request_time: Option<Instant>,

    /// Robots.txt policy, fetched once per crawl
    pub robots: Option<ParsedRobots>,
}

impl HostState {
    /// Creates a new HostState with no history
    pub fn new() -> Self {
        Self::default()
    }

    /// Calculates the time until the next request can be made
    ///
    /// Returns None if a request can be made now, or the duration to wait otherwise.
    pub fn time_until_next_request(&self, delay: Duration, now: Instant) -> Option<Duration> {
        let last = self.last_request_time?;
        let elapsed = now.saturating_duration_since(last);
        if elapsed < delay {
            Some(delay - elapsed)
        } else {
            None
        }
    }

    /// Records that a request was made to this host
    pub fn record_request(&mut self, now: Instant) {
        self.request_count += 1;
        self.last_request_time = Some(now);
    }

    /// Stores the robots.txt policy for this host
    pub fn update_robots(&mut self, robots: ParsedRobots) {
        self.robots = Some(robots);
    }
}
