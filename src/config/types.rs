use crate::crawler::PageLimit;
use crate::url::ScopeMode;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for Sumi-Scrape
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Minimum time between consecutive requests to the same host (milliseconds)
    #[serde(rename = "delay-ms")]
    pub delay_ms: u64,

    /// Total time allowed for a single request (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Time allowed to establish a connection (seconds)
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,

    /// Scope applied when the caller does not choose one
    pub scope: ScopeMode,

    /// Maximum number of pages to store: a count or "unlimited"
    #[serde(rename = "page-limit")]
    pub page_limit: PageLimit,
}

impl CrawlerConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            delay_ms: 1000,
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
            scope: ScopeMode::Auto,
            page_limit: PageLimit::default(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler, also the token matched against robots.txt groups
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,
}

impl UserAgentConfig {
    /// Formats the full user agent header value
    ///
    /// Format: `CrawlerName/Version (+ContactURL; compliant crawler)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; compliant crawler)",
            self.crawler_name, self.crawler_version, self.contact_url
        )
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "SumiScrape".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://github.com/sumi-scrape/sumi-scrape".to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory under which per-host folders are written
    pub root: PathBuf,

    /// Whether each document starts with a `# URL: ...` line
    #[serde(rename = "source-header")]
    pub source_header: bool,

    /// Append a short URL hash to every file name so distinct URLs never share a path
    #[serde(rename = "disambiguate-collisions")]
    pub disambiguate_collisions: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("scraped_output"),
            source_header: true,
            disambiguate_collisions: false,
        }
    }
}
