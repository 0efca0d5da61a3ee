//! Output module for persisting pages and reporting crawl results
//!
//! This module handles:
//! - Writing normalized documents under the output root
//! - The per-page result records returned to the caller
//! - Summarizing a finished crawl

mod report;
mod store;

pub use report::{print_report, CrawlReport, PageFailure, PageResult};
pub use store::{FileStore, Store, StoreError, StoreResult};

/// Prepends the `# URL: ...` source line to a document
pub fn with_source_header(url: &str, content: &str) -> String {
    format!("# URL: {}\n\n{}", url, content)
}
