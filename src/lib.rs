//! Sumi-Scrape: a polite, scope-bounded page scraper
//!
//! This crate crawls a bounded set of pages starting from a seed URL, keeps the
//! crawl inside a caller-chosen scope (single page, directory, directory tree or
//! whole domain), converts each page to Markdown and writes one document per
//! page under a path derived from its URL.

pub mod config;
pub mod crawler;
pub mod normalize;
pub mod output;
pub mod robots;
pub mod state;
pub mod url;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Sumi-Scrape operations
///
/// Only conditions that make the whole crawl impossible surface here. Per-page
/// problems are reported through [`FetchError`], [`output::StoreError`] and
/// [`normalize::NormalizeError`] and never abort a crawl.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid seed URL: {0}")]
    InvalidInput(#[from] UrlError),

    #[error("Output root {path} is not writable: {source}")]
    OutputRoot {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::CrawlState,
        to: state::CrawlState,
    },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Errors from fetching a single page
///
/// All variants are recoverable: the coordinator logs them and moves on to the
/// next URL in the frontier.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },

    #[error("HTTP {status} for {url}")]
    Http { url: String, status: u16 },

    #[error("URL disallowed by robots.txt: {url}")]
    Disallowed { url: String },

    #[error("Redirect from {url} not followed: {message}")]
    Redirect { url: String, message: String },

    #[error("Unsupported content type {content_type} for {url}")]
    UnsupportedContent { url: String, content_type: String },
}

impl FetchError {
    /// Short label used in reports and logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Network { .. } => "network",
            Self::Http { .. } => "http",
            Self::Disallowed { .. } => "disallowed",
            Self::Redirect { .. } => "redirect",
            Self::UnsupportedContent { .. } => "content-type",
        }
    }
}

/// Result type alias for Sumi-Scrape operations
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CancelHandle, CrawlRequest, Crawler};
pub use output::{CrawlReport, PageResult};
pub use state::CrawlState;
pub use crate::url::{derive_path, in_scope, normalize_url, ScopeMode};
