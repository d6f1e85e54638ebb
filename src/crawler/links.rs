//! Link extractor
//!
//! Finds links to other threads inside the original poster's posts.

use crate::crawler::parser::PostContainer;
use crate::url::{is_thread_first_page, Origin};
use std::collections::BTreeSet;
use url::Url;

/// Collects thread first-page URLs linked from `posts`
///
/// A link qualifies when, resolved against `base_url` and normalized, its path
/// has the thread first-page shape and, if `allowed_origin` is set, it lives
/// on that origin. The result is deduplicated; ordering carries no meaning
/// beyond making recursion order reproducible.
pub fn extract_new_threads(
    posts: &[PostContainer],
    base_url: &Url,
    allowed_origin: Option<&Origin>,
) -> BTreeSet<Url> {
    posts
        .iter()
        .flat_map(|post| post.outbound_urls(base_url))
        .filter(is_thread_first_page)
        .filter(|url| allowed_origin.map_or(true, |origin| origin.contains(url)))
        .collect()
}
