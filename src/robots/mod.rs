//! Robots.txt handling module
//!
//! This module fetches and parses robots.txt files. Parsed policies are cached
//! per host in [`crate::state::HostState`] for the lifetime of one crawl.

mod parser;

pub use parser::ParsedRobots;

use reqwest::Client;
use url::Url;

/// Fetches robots.txt for the origin of `url`
///
/// | Response | Policy |
/// |----------|--------|
/// | 2xx | parsed body |
/// | 4xx | allow all (no policy published) |
/// | 5xx, network error | allow all, logged |
///
/// # Arguments
///
/// * `client` - The HTTP client (already carrying the crawler user agent)
/// * `url` - Any URL on the host whose policy is needed
pub async fn fetch_robots(client: &Client, url: &Url) -> ParsedRobots {
    let robots_url = match url.join("/robots.txt") {
        Ok(u) => u,
        Err(e) => {
            tracing::warn!("Cannot build robots.txt URL for {}: {}", url, e);
            return ParsedRobots::allow_all();
        }
    };

    tracing::debug!("Fetching {}", robots_url);

    let response = match client.get(robots_url.clone()).send().await {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!("Failed to fetch {}: {}; allowing all", robots_url, e);
            return ParsedRobots::allow_all();
        }
    };

    let status = response.status();
    if status.is_client_error() {
        tracing::debug!("{} returned {}; allowing all", robots_url, status);
        return ParsedRobots::allow_all();
    }

    if !status.is_success() {
        tracing::warn!("{} returned {}; allowing all", robots_url, status);
        return ParsedRobots::allow_all();
    }

    match response.text().await {
        Ok(body) => ParsedRobots::from_content(&body),
        Err(e) => {
            tracing::warn!("Failed to read {}: {}; allowing all", robots_url, e);
            ParsedRobots::allow_all()
        }
    }
}

/// Checks if a URL is allowed by robots.txt
///
/// # Arguments
///
/// * `robots` - The parsed robots.txt data
/// * `url` - The URL to check
/// * `agent` - The robots product token (crawler name)
pub fn is_allowed(robots: &ParsedRobots, url: &str, agent: &str) -> bool {
    robots.is_allowed(url, agent)
}
