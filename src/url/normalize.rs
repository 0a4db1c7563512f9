use crate::UrlError;
use url::Url;

/// Scheme assumed for scan targets that are given without one
const DEFAULT_SCHEME: &str = "https";

/// Normalizes a scan target into an absolute HTTP(S) URL
///
/// # Normalization Steps
///
/// 1. Trim surrounding whitespace; reject empty input
/// 2. Prepend `https://` when no scheme is present (`example.com`, `//example.com`,
///    `localhost:8080/path`)
/// 3. Parse the URL; reject if malformed
/// 4. Reject schemes other than `http` and `https`
/// 5. Reject URLs without a host
/// 6. Remove the fragment
///
/// Host lowercasing and empty-path-to-`/` are applied by the parser itself.
///
/// # Examples
///
/// ```
/// use contact_sweep::url::normalize_target;
///
/// let url = normalize_target("Example.COM/contact#team").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/contact");
/// ```
pub fn normalize_target(input: &str) -> Result<Url, UrlError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(UrlError::Parse("empty URL".to_string()));
    }

    let candidate = if has_leading_scheme(trimmed) {
        trimmed.to_string()
    } else if let Some(rest) = trimmed.strip_prefix("//") {
        format!("{}://{}", DEFAULT_SCHEME, rest)
    } else if let Some(scheme) = explicit_scheme(trimmed) {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            scheme
        )));
    } else {
        format!("{}://{}", DEFAULT_SCHEME, trimmed)
    };

    let mut url = Url::parse(&candidate).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    url.set_fragment(None);

    Ok(url)
}

/// Returns true if the input starts with `<scheme>://`
///
/// A `://` that only appears after a path, query or fragment delimiter (a URL carried in
/// a query parameter, say) does not count.
fn has_leading_scheme(input: &str) -> bool {
    input
        .split_once("://")
        .map_or(false, |(scheme, _)| {
            !scheme.is_empty() && !scheme.contains(['/', '?', '#'])
        })
}

/// Detects scheme-only URLs such as `mailto:` or `javascript:`
///
/// `host:port` forms are not schemes and return None.
fn explicit_scheme(input: &str) -> Option<&str> {
    let (scheme, rest) = input.split_once(':')?;

    if rest.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }

    let valid = scheme.starts_with(|c: char| c.is_ascii_alphabetic())
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));

    valid.then_some(scheme)
}

/// Resolves a link attribute value to an absolute HTTP(S) URL
///
/// Returns None if the link should be excluded:
/// - Empty values
/// - Fragment-only references (the page itself)
/// - Non-HTTP(S) URLs after resolution (`javascript:`, `data:`, `ftp:` ...)
/// - Values that cannot be resolved
///
/// Fragments are stripped from the resolved URL.
pub fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let mut absolute = base_url.join(href).ok()?;
    if absolute.scheme() != "http" && absolute.scheme() != "https" {
        return None;
    }

    absolute.set_fragment(None);
    Some(absolute.to_string())
}
