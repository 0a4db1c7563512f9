use url::Url;

/// Lowercase host of a URL, without the port
///
/// ```
/// use contact_sweep::url::extract_domain;
/// use url::Url;
///
/// let url = Url::parse("https://Docs.Example.com:8443/guide").unwrap();
/// assert_eq!(extract_domain(&url).as_deref(), Some("docs.example.com"));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns true if `link` points at `host`
///
/// Links that fail to parse are never internal.
pub fn same_host(link: &str, host: &str) -> bool {
    Url::parse(link)
        .ok()
        .and_then(|u| extract_domain(&u))
        .map_or(false, |h| h == host)
}
