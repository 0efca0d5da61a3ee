//! Output path deriver
//!
//! Maps a URL to a filesystem-safe path relative to the output root:
//! `<sanitized host>/<sanitized path>.md`.
//!
//! Distinct URLs can map to the same path (characters folded to `_`, or URLs
//! that differ only by query string). By default the later page overwrites the
//! earlier one; [`derive_disambiguated_path`] appends a short URL hash instead.

use sha2::{Digest, Sha256};
use std::path::PathBuf;
use url::Url;

/// File extension for stored documents
const EXTENSION: &str = "md";

/// File stem used for an empty path
const INDEX_STEM: &str = "index";

/// Longest stem written before truncating and appending a hash
const MAX_STEM_LEN: usize = 200;

/// Hex characters of the URL hash used in disambiguated names
const HASH_LEN: usize = 8;

/// Derives the relative output path for a URL
///
/// # Examples
///
/// ```
/// use std::path::PathBuf;
/// use sumi_scrape::url::derive_path;
/// use url::Url;
///
/// let url = Url::parse("http://example.test/docs/intro").unwrap();
/// assert_eq!(derive_path(&url), PathBuf::from("example_test/docs_intro.md"));
/// ```
pub fn derive_path(url: &Url) -> PathBuf {
    PathBuf::from(host_dir(url)).join(derive_file_name(url))
}

/// Derives the relative output path with a URL hash suffix on the file stem
///
/// The hash covers the full URL (query included, fragment excluded), so pages
/// differing only by query string land in separate files.
pub fn derive_disambiguated_path(url: &Url) -> PathBuf {
    let stem = format!("{}-{}", path_stem(url), url_hash(url));
    PathBuf::from(host_dir(url)).join(format!("{}.{}", stem, EXTENSION))
}

/// Derives the file name for a URL path
///
/// Leading and trailing slashes are stripped, an empty path becomes `index`,
/// and every character outside `[A-Za-z0-9._-]` becomes `_`.
pub fn derive_file_name(url: &Url) -> String {
    format!("{}.{}", path_stem(url), EXTENSION)
}

/// Derives the per-host directory name
///
/// Dots and the port separator are folded to `_` as well, giving names such
/// as `example_test` or `127_0_0_1_8080`.
pub fn host_dir(url: &Url) -> String {
    let host = url.host_str().unwrap_or("unknown-host").to_lowercase();
    let raw = match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host,
    };
    raw.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect()
}

fn path_stem(url: &Url) -> String {
    let trimmed = url.path().trim_matches('/');
    if trimmed.is_empty() {
        return INDEX_STEM.to_string();
    }

    let sanitized = sanitize(trimmed);
    if sanitized.len() > MAX_STEM_LEN {
        // Sanitized text is ASCII, so byte slicing is safe
        format!("{}-{}", &sanitized[..MAX_STEM_LEN], url_hash(url))
    } else {
        sanitized
    }
}

fn sanitize(segment: &str) -> String {
    segment
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn url_hash(url: &Url) -> String {
    let key = match url.as_str().split_once('#') {
        Some((head, _)) => head,
        None => url.as_str(),
    };
    let digest = Sha256::digest(key.as_bytes());
    hex::encode(digest)[..HASH_LEN].to_string()
}
