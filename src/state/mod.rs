//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlState`: lifecycle of one crawl (idle, running, completed, aborted)
//! - `HostState`: per-host politeness timing and cached robots.txt policy

mod crawl_state;
mod host_state;

// Re-export main types
pub use crawl_state::CrawlState;
pub use host_state::HostState;
