//! HTTP fetcher implementation
//!
//! This module handles all page requests for the crawler, including:
//! - Building HTTP clients with the crawler's user agent and timeouts
//! - Single-hop GET requests (redirects are returned, not followed)
//! - Rejecting bodies that are not text documents
//! - Error classification into [`FetchError`] kinds

use crate::config::Config;
use crate::url::strip_fragment;
use crate::FetchError;
use reqwest::{header, redirect::Policy, Client, Response};
use std::time::Duration;
use url::Url;

/// Maximum redirect hops followed for one page
pub const MAX_REDIRECTS: usize = 10;

/// Media types handed to the normalizer
const TEXT_CONTENT_TYPES: &[&str] = &["text/html", "application/xhtml+xml", "text/plain"];

/// A successfully fetched page
#[derive(Debug, Clone)]
pub struct RawPage {
    /// URL the body was served from
    pub final_url: Url,

    /// Page body content
    pub body: String,
}

/// Result of one GET request
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    /// 2xx response with a text body
    Page(RawPage),

    /// 3xx response; the caller decides whether to follow `location`
    Redirect { location: Url },
}

/// Builds an HTTP client with proper configuration
///
/// Redirects are never followed by the client itself, so every hop can be
/// checked against scope and robots.txt by the caller.
///
/// # Example
///
/// ```no_run
/// use sumi_scrape::config::Config;
/// use sumi_scrape::crawler::build_http_client;
///
/// let client = build_http_client(&Config::default()).unwrap();
/// ```
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.header_value())
        .timeout(Duration::from_secs(config.crawler.request_timeout_secs))
        .connect_timeout(Duration::from_secs(config.crawler.connect_timeout_secs))
        .redirect(Policy::none()) // Handle redirects manually
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL with a single GET request
///
/// # Outcome Mapping
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx, text content type (or none) | `Page` |
/// | 2xx, other content type | `UnsupportedContent` |
/// | 3xx with a usable `Location` | `Redirect` |
/// | 3xx without one | `Redirect` error |
/// | Other non-2xx status | `Http { status }` |
/// | Timeout, connection failure, body read failure | `Network` |
///
/// Robots policy is checked by the caller before this is invoked.
pub async fn fetch_url(client: &Client, url: &Url) -> Result<FetchOutcome, FetchError> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| network_error(url, &e))?;

    let status = response.status();
    if status.is_redirection() {
        return redirect_target(url, &response).map(|location| FetchOutcome::Redirect { location });
    }

    if !status.is_success() {
        return Err(FetchError::Http {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    if let Some(content_type) = content_type(&response) {
        if !is_text_document(&content_type) {
            return Err(FetchError::UnsupportedContent {
                url: url.to_string(),
                content_type,
            });
        }
    }

    let final_url = response.url().clone();
    let body = response.text().await.map_err(|e| network_error(url, &e))?;

    Ok(FetchOutcome::Page(RawPage { final_url, body }))
}

/// Resolves the `Location` header of a 3xx response
fn redirect_target(url: &Url, response: &Response) -> Result<Url, FetchError> {
    let redirect_error = |message: String| FetchError::Redirect {
        url: url.to_string(),
        message,
    };

    let location = response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            redirect_error(format!("HTTP {} without a Location header", response.status().as_u16()))
        })?;

    let target = url
        .join(location)
        .map_err(|e| redirect_error(format!("invalid Location '{}': {}", location, e)))?;

    match target.scheme() {
        "http" | "https" => Ok(strip_fragment(target)),
        scheme => Err(redirect_error(format!("unsupported scheme '{}'", scheme))),
    }
}

fn content_type(response: &Response) -> Option<String> {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Returns true for HTML, XHTML and plain text, ignoring parameters
fn is_text_document(content_type: &str) -> bool {
    let media_type = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    TEXT_CONTENT_TYPES.contains(&media_type.as_str())
}

fn network_error(url: &Url, error: &reqwest::Error) -> FetchError {
    let message = if error.is_timeout() {
        "Request timeout".to_string()
    } else if error.is_connect() {
        "Connection failed".to_string()
    } else {
        error.to_string()
    };

    FetchError::Network {
        url: url.to_string(),
        message,
    }
}
