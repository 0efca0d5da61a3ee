use url::Url;

/// Extracts the host key used to group per-host crawl state
///
/// The key is the lowercase host, followed by `:port` when the URL carries a
/// non-default port, so two servers on one machine never share politeness or
/// robots state.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sumi_scrape::url::host_key;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(host_key(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("http://127.0.0.1:8080/").unwrap();
/// assert_eq!(host_key(&url), Some("127.0.0.1:8080".to_string()));
/// ```
pub fn host_key(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();
    match url.port() {
        Some(port) => Some(format!("{}:{}", host, port)),
        None => Some(host),
    }
}
