use crate::UrlError;
use url::Url;

/// Normalizes a URL into the form used for visited-set comparison
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed or relative
/// 2. Require an `http` or `https` scheme
/// 3. Require a host
/// 4. Remove the fragment (everything after #)
///
/// Parsing already lowercases the host and resolves dot segments. Query strings
/// are preserved: `/a?page=1` and `/a?page=2` are different pages.
///
/// # Examples
///
/// ```
/// use sumi_scrape::url::normalize_url;
///
/// let url = normalize_url("https://EXAMPLE.com/docs/../guide#intro").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/guide");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    Ok(strip_fragment(url))
}

/// Removes the fragment from an already parsed URL
pub fn strip_fragment(mut url: Url) -> Url {
    url.set_fragment(None);
    url
}
