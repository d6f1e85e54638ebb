use regex::Regex;
use std::sync::OnceLock;
use url::Url;

/// Path shape of a thread's first page: `thread-<id>-1-<list page>.html`
/// where the list page is also fixed to 1.
const THREAD_FIRST_PAGE: &str = r"(?:^|/)thread-\d+-1-1\.html$";

/// Path shape of any thread page, capturing the page number
const THREAD_PAGE: &str = r"(?:^|/)thread-\d+-(\d+)-\d+\.html$";

fn thread_first_page_regex() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(THREAD_FIRST_PAGE).expect("thread pattern is valid"))
}

fn thread_page_regex() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(THREAD_PAGE).expect("page pattern is valid"))
}

/// Checks if a URL points at the first page of a thread
///
/// Only the path is inspected, so query strings and fragments never change
/// the answer.
///
/// # Examples
///
/// ```
/// use forum_ripple::url::is_thread_first_page;
/// use url::Url;
///
/// let first = Url::parse("https://forum.example/thread-123-1-1.html?from=x#pid1").unwrap();
/// assert!(is_thread_first_page(&first));
///
/// let second = Url::parse("https://forum.example/thread-123-2-1.html").unwrap();
/// assert!(!is_thread_first_page(&second));
/// ```
pub fn is_thread_first_page(url: &Url) -> bool {
    thread_first_page_regex().is_match(url.path())
}

/// Extracts the numeric thread identifier from a first-page URL
pub fn thread_id(url: &Url) -> Option<u64> {
    if !is_thread_first_page(url) {
        return None;
    }

    let segment = url.path_segments()?.last()?;
    segment
        .strip_prefix("thread-")?
        .split('-')
        .next()?
        .parse()
        .ok()
}

/// Extracts the page number of a thread page URL
///
/// Understands the static `thread-<id>-<page>-<list>.html` shape and the
/// dynamic `?page=<n>` query parameter.
pub fn page_number(url: &Url) -> Option<u32> {
    if let Some(captures) = thread_page_regex().captures(url.path()) {
        return captures.get(1)?.as_str().parse().ok();
    }

    url.query_pairs()
        .find(|(key, _)| key == "page")
        .and_then(|(_, value)| value.parse().ok())
}
