//! Thread assembler
//!
//! Given a thread's first-page URL, this module resolves every page of the
//! thread and gathers the original poster's posts and images across them.
//!
//! # Failure policy
//!
//! | Condition | Result |
//! |-----------|--------|
//! | First page fetch fails | `Abandoned(FirstPageFetch)` |
//! | No poster on first page | `Abandoned(AuthorNotFound)` |
//! | Later page fetch fails | page skipped, recorded in `failed_pages` |
//! | No OP posts anywhere | `Assembled` with empty post list |

use crate::crawler::fetcher::{FetchError, PageSource};
use crate::crawler::parser::{PageReader, PostContainer, ThreadPage};
use crate::url::page_number;
use std::collections::BTreeSet;
use std::fmt;
use url::Url;

/// The original poster's content for one thread, across all its pages
#[derive(Debug, Clone)]
pub struct AggregatedThread {
    /// First-page URL
    pub url: Url,
    pub title: String,
    pub author: String,

    /// OP posts in page order, then document order within a page
    pub posts: Vec<PostContainer>,

    pub image_urls: BTreeSet<Url>,

    /// Every page URL that was attempted, in processing order
    pub pages: Vec<Url>,

    /// Pages that could not be fetched, with the error text
    pub failed_pages: Vec<(Url, String)>,
}

impl AggregatedThread {
    /// True when some pages were lost and the archive is incomplete
    pub fn is_partial(&self) -> bool {
        !self.failed_pages.is_empty()
    }
}

/// Why a thread was given up on
#[derive(Debug)]
pub enum AbandonReason {
    FirstPageFetch(FetchError),
    AuthorNotFound,
}

impl fmt::Display for AbandonReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FirstPageFetch(e) => write!(f, "first page fetch failed: {}", e),
            Self::AuthorNotFound => f.write_str("original poster could not be identified"),
        }
    }
}

/// Result of assembling one thread
#[derive(Debug)]
pub enum Assembly {
    Assembled(AggregatedThread),
    Abandoned(AbandonReason),
}

/// Resolves the full, ordered page set of a thread
///
/// The first page always comes first and is always present. Pagination
/// links are deduplicated and ordered by page number where the URL carries
/// one, then lexicographically, so the order is stable within a run.
pub fn thread_pages(first_page: &ThreadPage) -> Vec<Url> {
    let others: BTreeSet<(u32, String)> = first_page
        .pagination_links()
        .into_iter()
        .filter(|url| url != &first_page.url)
        .map(|url| (page_number(&url).unwrap_or(u32::MAX), url.to_string()))
        .collect();

    let mut pages = vec![first_page.url.clone()];
    pages.extend(
        others
            .into_iter()
            .filter_map(|(_, url)| Url::parse(&url).ok()),
    );
    pages
}

/// Assembles a thread starting from its first page
///
/// The first page is fetched once and reused when its turn comes in the
/// page loop.
pub async fn assemble<S, R>(source: &S, reader: &R, first_page_url: &Url) -> Assembly
where
    S: PageSource + ?Sized,
    R: PageReader + ?Sized,
{
    let html = match source.fetch_page(first_page_url).await {
        Ok(html) => html,
        Err(e) => return Assembly::Abandoned(AbandonReason::FirstPageFetch(e)),
    };
    let first_page = reader.read_page(&html, first_page_url);

    let title = first_page.title_or_placeholder();
    let author = match first_page.author() {
        Some(author) => author.to_string(),
        None => return Assembly::Abandoned(AbandonReason::AuthorNotFound),
    };
    tracing::info!("Original poster: {} ({})", author, title);

    let pages = thread_pages(&first_page);
    let mut first_page = Some(first_page);
    let mut thread = AggregatedThread {
        url: first_page_url.clone(),
        title,
        author,
        posts: Vec::new(),
        image_urls: BTreeSet::new(),
        pages: pages.clone(),
        failed_pages: Vec::new(),
    };

    for page_url in pages {
        tracing::info!("Processing page: {}", page_url);

        let page = if page_url == *first_page_url {
            match first_page.take() {
                Some(page) => page,
                None => continue,
            }
        } else {
            match source.fetch_page(&page_url).await {
                Ok(html) => reader.read_page(&html, &page_url),
                Err(e) => {
                    tracing::warn!("Skipping page {}: {}", page_url, e);
                    thread.failed_pages.push((page_url, e.to_string()));
                    continue;
                }
            }
        };

        let posts = page.into_posts_by(&thread.author);
        for post in &posts {
            thread.image_urls.extend(post.image_urls());
        }
        thread.posts.extend(posts);
    }

    Assembly::Assembled(thread)
}
