//! Crawl results and summary reporting

use crate::state::CrawlState;
use crate::url::ScopeMode;
use crate::FetchError;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use url::Url;

/// One successfully fetched and normalized page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResult {
    /// The page URL, fragment stripped
    pub url: Url,

    /// Output path relative to the output root, `<host>/<page>.md`
    pub relative_path: PathBuf,

    /// Normalized content, without the source header
    pub content: String,
}

/// A URL that was dequeued but produced no page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFailure {
    pub url: Url,
    pub error: FetchError,
}

/// Outcome of a finished crawl
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Terminal state, always `Completed` for a returned report
    pub state: CrawlState,

    /// The scope the crawl ran under, after resolving `Auto`
    pub scope: ScopeMode,

    /// Pages in fetch order
    pub results: Vec<PageResult>,

    /// Fetch failures in the order they happened
    pub failures: Vec<PageFailure>,

    /// Pages whose document could not be written (still listed in `results`)
    pub store_failures: Vec<Url>,

    /// Whether the crawl stopped because of a cancel request
    pub cancelled: bool,
}

impl CrawlReport {
    /// Creates an empty report for a crawl under `scope`
    pub fn new(scope: ScopeMode) -> Self {
        Self {
            state: CrawlState::Running,
            scope,
            results: Vec::new(),
            failures: Vec::new(),
            store_failures: Vec::new(),
            cancelled: false,
        }
    }

    /// Number of pages fetched and normalized
    pub fn pages_fetched(&self) -> usize {
        self.results.len()
    }

    /// Number of pages whose document reached the store
    pub fn pages_stored(&self) -> usize {
        self.results.len() - self.store_failures.len()
    }

    /// Counts fetch failures by kind
    pub fn failures_by_kind(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for failure in &self.failures {
            *counts.entry(failure.error.kind()).or_insert(0) += 1;
        }
        counts
    }
}

/// Prints a crawl report to stdout in a formatted manner
///
/// # Arguments
///
/// * `report` - The report to display
/// * `root` - The output root the documents were written under
pub fn print_report(report: &CrawlReport, root: &Path) {
    println!("=== Crawl Report ===\n");

    println!("Overview:");
    println!("  State: {}", report.state);
    println!("  Scope: {}", report.scope);
    println!("  Pages fetched: {}", report.pages_fetched());
    println!("  Pages stored: {}", report.pages_stored());
    if report.cancelled {
        println!("  Stopped early: cancelled");
    }
    println!();

    if !report.results.is_empty() {
        println!("Pages:");
        for page in &report.results {
            println!(
                "  {} -> {}",
                page.url,
                root.join(&page.relative_path).display()
            );
        }
        println!();
    }

    let by_kind = report.failures_by_kind();
    if !by_kind.is_empty() {
        println!("Failures:");
        for (kind, count) in by_kind {
            println!("  {}: {}", kind, count);
        }
        for failure in &report.failures {
            println!("  - {}", failure.error);
        }
        println!();
    }

    if !report.store_failures.is_empty() {
        println!("Not written ({}):", report.store_failures.len());
        for url in &report.store_failures {
            println!("  - {}", url);
        }
    }
}
