//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching
//! - HTML link extraction
//! - Frontier management and politeness delay
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod parser;
mod request;
mod scheduler;

pub use coordinator::{CancelHandle, Crawler};
pub use fetcher::{build_http_client, fetch_url, FetchOutcome, RawPage, MAX_REDIRECTS};
pub use parser::extract_links;
pub use request::{CrawlRequest, PageLimit};
pub use scheduler::{Frontier, Scheduler};

use crate::config::Config;
use crate::output::CrawlReport;
use crate::ScrapeError;

/// Runs a complete crawl operation
///
/// This is the main entry point for a one-off crawl. It will:
/// 1. Build the HTTP client and file store from `config`
/// 2. Validate the seed and resolve the scope
/// 3. Fetch, normalize and store pages breadth-first
/// 4. Return the pages in fetch order
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl completed (possibly with zero pages)
/// * `Err(ScrapeError)` - Crawl aborted: invalid seed or unwritable output root
pub async fn crawl(config: Config, request: CrawlRequest) -> Result<CrawlReport, ScrapeError> {
    let mut crawler = Crawler::new(config)?;
    crawler.run(request).await
}
