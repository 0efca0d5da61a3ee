//! Content normalization
//!
//! The crawler hands every fetched page to a [`Normalizer`] and stores whatever
//! text it returns. The default [`MarkdownNormalizer`] converts HTML to
//! Markdown; callers can inject their own implementation.

mod markdown;

pub use markdown::MarkdownNormalizer;

use thiserror::Error;
use url::Url;

/// Errors a normalizer may report
///
/// The crawler treats these as recoverable and records the page with empty
/// content.
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("Conversion failed: {0}")]
    Conversion(String),
}

/// Converts fetched HTML into the stored textual representation
///
/// Implementations should be deterministic for a given URL and HTML, and
/// should degrade to best-effort text on malformed markup instead of failing.
pub trait Normalizer: Send + Sync {
    fn normalize(&self, html: &str, source_url: &Url) -> Result<String, NormalizeError>;
}

impl<F> Normalizer for F
where
    F: Fn(&str, &Url) -> Result<String, NormalizeError> + Send + Sync,
{
    fn normalize(&self, html: &str, source_url: &Url) -> Result<String, NormalizeError> {
        self(html, source_url)
    }
}
