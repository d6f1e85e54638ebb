use crate::{UrlError, UrlResult};
use url::Url;

/// Schemes that never point at a fetchable page
const SKIPPED_SCHEMES: &[&str] = &["javascript:", "mailto:", "tel:", "data:"];

/// Normalizes a URL into the canonical form used for every comparison
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Require an HTTP or HTTPS scheme
/// 3. Require a host (lowercased by the parser, default port dropped)
/// 4. Resolve dot segments in the path (done by the parser)
/// 5. Remove the fragment
/// 6. Remove an empty query string (trailing ?)
///
/// The query string is otherwise kept verbatim: forum software routes pages
/// through it (`forum.php?mod=viewthread&tid=1`), so it is part of the identity.
///
/// # Examples
///
/// ```
/// use forum_ripple::url::normalize_url;
///
/// let url = normalize_url("HTTPS://Forum.Example:443/a/../thread-1-1-1.html?#top").unwrap();
/// assert_eq!(url.as_str(), "https://forum.example/thread-1-1-1.html");
/// ```
pub fn normalize_url(url_str: &str) -> UrlResult<Url> {
    let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;
    normalize_parsed(url)
}

/// Normalizes an already parsed URL
pub fn normalize_parsed(mut url: Url) -> UrlResult<Url> {
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

    if url.query() == Some("") {
        url.set_query(None);
    }

    Ok(url)
}

/// Returns true if an href is worth resolving at all
///
/// Empty hrefs, same-page anchors and script/mail/phone/data links are
/// rejected before any URL parsing happens.
pub fn is_followable_href(href: &str) -> bool {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return false;
    }

    let lower = href.to_ascii_lowercase();
    !SKIPPED_SCHEMES
        .iter()
        .any(|scheme| lower.starts_with(scheme))
}

/// Resolves an href against a base URL and normalizes the result
///
/// Returns an error for hrefs that are not followable or do not resolve to
/// an HTTP(S) URL.
///
/// # Examples
///
/// ```
/// use forum_ripple::url::resolve_href;
/// use url::Url;
///
/// let base = Url::parse("https://forum.example/thread-1-1-1.html").unwrap();
/// let url = resolve_href(&base, "thread-1-2-1.html#pid9").unwrap();
/// assert_eq!(url.as_str(), "https://forum.example/thread-1-2-1.html");
/// assert!(resolve_href(&base, "javascript:void(0)").is_err());
/// ```
pub fn resolve_href(base: &Url, href: &str) -> UrlResult<Url> {
    if !is_followable_href(href) {
        return Err(UrlError::Unusable(href.to_string()));
    }

    let joined = base
        .join(href.trim())
        .map_err(|e| UrlError::Parse(format!("{}: {}", href, e)))?;

    normalize_parsed(joined)
}
