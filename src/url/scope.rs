//! Scope classifier
//!
//! Decides whether a discovered link belongs to the crawl, relative to the
//! seed URL and the active [`ScopeMode`].

use super::ScopeMode;
use url::Url;

/// Seed path suffixes that mark a single document rather than a directory
const PAGE_EXTENSIONS: &[&str] = &[".html", ".htm", ".php", ".aspx"];

/// Path suffixes that are never documents, in any mode
const ASSET_EXTENSIONS: &[&str] = &[".css", ".js", ".png", ".jpg", ".jpeg", ".gif"];

impl ScopeMode {
    /// Resolves `Auto` into a concrete mode from the seed path
    ///
    /// | Seed path | Mode |
    /// |-----------|------|
    /// | `/` or empty | `Domain` |
    /// | ends in `.html`, `.htm`, `.php`, `.aspx` | `Single` |
    /// | anything else | `RecursiveDirectory` |
    ///
    /// Concrete modes are returned unchanged.
    pub fn resolve(self, seed: &Url) -> ScopeMode {
        if self != ScopeMode::Auto {
            return self;
        }

        let path = seed.path();
        if path.is_empty() || path == "/" {
            ScopeMode::Domain
        } else if has_suffix(path, PAGE_EXTENSIONS) {
            ScopeMode::Single
        } else {
            ScopeMode::RecursiveDirectory
        }
    }
}

/// Decides whether `candidate` is in scope for a crawl seeded at `base`
///
/// # Rules
///
/// - Every mode rejects other hosts (exact host and port match, no subdomain
///   wildcarding) and stylesheet/script/image paths.
/// - `Domain`: any path on the base host.
/// - `Directory`: the base directory itself or a direct child of it.
/// - `RecursiveDirectory`: the base directory or anything below it, matched on
///   whole path segments.
/// - `Single`: only the base URL itself.
/// - `Auto` is resolved from `base` first.
///
/// Both URLs are compared without their fragments.
///
/// # Examples
///
/// ```
/// use sumi_scrape::url::in_scope;
/// use sumi_scrape::ScopeMode;
/// use url::Url;
///
/// let base = Url::parse("https://x.com/a/b/").unwrap();
/// let child = Url::parse("https://x.com/a/b/c").unwrap();
/// let grandchild = Url::parse("https://x.com/a/b/c/d").unwrap();
///
/// assert!(in_scope(ScopeMode::Directory, &base, &child));
/// assert!(!in_scope(ScopeMode::Directory, &base, &grandchild));
/// assert!(in_scope(ScopeMode::RecursiveDirectory, &base, &grandchild));
/// ```
pub fn in_scope(mode: ScopeMode, base: &Url, candidate: &Url) -> bool {
    if !same_host(base, candidate) {
        return false;
    }

    if is_asset_path(candidate.path()) {
        return false;
    }

    match mode.resolve(base) {
        ScopeMode::Domain => true,
        ScopeMode::Directory => is_same_directory(base.path(), candidate.path()),
        ScopeMode::RecursiveDirectory => is_subdirectory(base.path(), candidate.path()),
        ScopeMode::Single => without_fragment(base) == without_fragment(candidate),
        // resolve() never yields Auto
        ScopeMode::Auto => false,
    }
}

/// Returns true if the path names a stylesheet, script or image
pub fn is_asset_path(path: &str) -> bool {
    has_suffix(path, ASSET_EXTENSIONS)
}

fn has_suffix(path: &str, suffixes: &[&str]) -> bool {
    let lower = path.to_ascii_lowercase();
    suffixes.iter().any(|ext| lower.ends_with(ext))
}

fn same_host(a: &Url, b: &Url) -> bool {
    a.host_str() == b.host_str() && a.port_or_known_default() == b.port_or_known_default()
}

fn without_fragment(url: &Url) -> &str {
    match url.as_str().split_once('#') {
        Some((head, _)) => head,
        None => url.as_str(),
    }
}

/// Exact directory or one extra segment, trailing slashes ignored
fn is_same_directory(base_path: &str, candidate_path: &str) -> bool {
    let base = base_path.trim_end_matches('/');
    let candidate = candidate_path.trim_end_matches('/');

    if candidate == base {
        return true;
    }

    match candidate.strip_prefix(base).and_then(|rest| rest.strip_prefix('/')) {
        Some(segment) => !segment.is_empty() && !segment.contains('/'),
        None => false,
    }
}

/// Segment-wise prefix match against the base directory
fn is_subdirectory(base_path: &str, candidate_path: &str) -> bool {
    let base = base_path.trim_end_matches('/');
    let candidate = candidate_path.trim_end_matches('/');

    candidate == base || candidate_path.starts_with(&format!("{}/", base))
}
