//! Crawl request types

use crate::url::ScopeMode;
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;

/// Upper bound on pages stored by one crawl
///
/// Defaults to a single page. `UNLIMITED` crawls until the frontier empties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageLimit(Option<usize>);

impl PageLimit {
    pub const UNLIMITED: PageLimit = PageLimit(None);

    pub const fn pages(count: usize) -> Self {
        Self(Some(count))
    }

    /// The bound, or None when unlimited
    pub fn get(&self) -> Option<usize> {
        self.0
    }

    /// Returns true once `fetched` pages satisfy the limit
    pub fn is_reached(&self, fetched: usize) -> bool {
        self.get().is_some_and(|limit| fetched >= limit)
    }
}

impl Default for PageLimit {
    fn default() -> Self {
        Self::pages(1)
    }
}

impl fmt::Display for PageLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(limit) => write!(f, "{}", limit),
            None => f.write_str("unlimited"),
        }
    }
}

impl FromStr for PageLimit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("unlimited") {
            return Ok(Self::UNLIMITED);
        }
        s.parse::<usize>()
            .map(Self::pages)
            .map_err(|_| format!("expected a page count or 'unlimited', got '{}'", s))
    }
}

impl<'de> Deserialize<'de> for PageLimit {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Count(usize),
            Word(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Count(n) => Ok(Self::pages(n)),
            Raw::Word(word) => word.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// One crawl to perform
///
/// Immutable once handed to [`crate::Crawler::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlRequest {
    /// Absolute seed URL, with scheme
    pub seed: String,

    /// Scope policy; `Auto` is resolved from the seed path
    pub scope: ScopeMode,

    /// Maximum number of pages to store
    pub page_limit: PageLimit,
}

impl CrawlRequest {
    /// Creates a request with auto-detected scope and the default limit of one page
    pub fn new(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            scope: ScopeMode::Auto,
            page_limit: PageLimit::default(),
        }
    }

    pub fn with_scope(mut self, scope: ScopeMode) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_page_limit(mut self, page_limit: PageLimit) -> Self {
        self.page_limit = page_limit;
        self
    }
}
