//! Sumi-Scrape main entry point
//!
//! This is the command-line interface for the Sumi-Scrape page scraper.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use sumi_scrape::config::{load_config, Config};
use sumi_scrape::crawler::{Crawler, PageLimit};
use sumi_scrape::output::print_report;
use sumi_scrape::{CrawlRequest, ScopeMode};
use tracing_subscriber::EnvFilter;

/// Sumi-Scrape: A polite, scope-bounded page scraper
///
/// Sumi-Scrape fetches pages starting from a seed URL, stays inside the chosen
/// scope, respects robots.txt and a per-host delay, and writes each page as a
/// Markdown document under the output directory.
#[derive(Parser, Debug)]
#[command(name = "sumi-scrape")]
#[command(version)]
#[command(about = "A polite, scope-bounded page scraper", long_about = None)]
struct Cli {
    /// Seed URL to start crawling from
    #[arg(value_name = "URL")]
    seed: String,

    /// Scope mode: single, directory, recursive-directory, domain or auto
    #[arg(short, long)]
    mode: Option<ScopeMode>,

    /// Maximum number of pages to fetch, or "unlimited"
    #[arg(short, long)]
    limit: Option<PageLimit>,

    /// Output root directory
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Minimum delay between requests to the same host, in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;
    let root = config.output.root.clone();

    let scope = cli.mode.unwrap_or(config.crawler.scope);
    let page_limit = cli.limit.unwrap_or(config.crawler.page_limit);
    let request = CrawlRequest::new(cli.seed.clone())
        .with_scope(scope)
        .with_page_limit(page_limit);

    let mut crawler = Crawler::new(config).context("Failed to initialize crawler")?;

    let cancel = crawler.cancel_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, finishing current page");
            cancel.cancel();
        }
    });

    let report = crawler
        .run(request)
        .await
        .with_context(|| format!("Crawl of {} failed", cli.seed))?;

    if !cli.quiet {
        print_report(&report, &root);
    }

    Ok(())
}

/// Loads the config file if given, then applies command-line overrides
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?
        }
        None => Config::default(),
    };

    if let Some(root) = &cli.output {
        config.output.root = root.clone();
    }
    if let Some(delay_ms) = cli.delay_ms {
        config.crawler.delay_ms = delay_ms;
    }

    Ok(config)
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_scrape=info,warn"),
            1 => EnvFilter::new("sumi_scrape=debug,info"),
            2 => EnvFilter::new("sumi_scrape=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
