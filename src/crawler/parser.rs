//! Thread page reader
//!
//! This module turns a fetched thread page into the pieces the crawl core
//! works with:
//! - The thread title (ordered fallback strategies)
//! - The original poster's display name
//! - Pagination links to the thread's other pages
//! - Post containers, with their author, OP marker, text, links and images
//!
//! Selectors target Discuz!-style markup (`table.plhin` posts, `div.authi`
//! author blocks, `td.t_f` bodies, `div.pgs` pagination).

use crate::url::resolve_href;
use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeSet;
use url::Url;

/// Placeholder title used when no strategy yields one
pub const UNKNOWN_TITLE: &str = "unknown_title";

/// Title selectors, tried in order; first non-empty text wins
const TITLE_STRATEGIES: &[&str] = &["span#thread_subject", "h1.ts", "title"];

/// Editorial badges that mark a post as the original poster's
const OP_MARKERS: &[&str] = &["楼主"];

/// File extensions that make a plain link count as an image reference
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "webp"];

/// Image attributes in preference order; Discuz lazy-loads full images via
/// `zoomfile`/`file` and leaves a placeholder in `src`
const IMAGE_ATTRIBUTES: &[&str] = &["zoomfile", "file", "src"];

/// One forum post as seen on a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostContainer {
    /// Poster display name
    pub poster: String,

    /// True when the post carries the original-poster badge
    pub op_marker: bool,

    /// Body text, one line per text node
    pub text: String,

    /// Raw `href` values of links in the body
    pub link_hrefs: Vec<String>,

    /// Raw image references in the body
    pub image_refs: Vec<String>,

    /// False when the post had no message body (e.g. a deleted post)
    pub has_body: bool,

    /// Page the post was read from; relative references resolve against it
    pub page_url: Url,
}

impl PostContainer {
    /// Authorship test: name match OR explicit original-poster badge
    pub fn is_by(&self, author: &str) -> bool {
        self.poster == author || self.op_marker
    }

    /// All outbound links, resolved against `base` and normalized
    pub fn outbound_urls(&self, base: &Url) -> Vec<Url> {
        self.link_hrefs
            .iter()
            .filter_map(|href| resolve_href(base, href).ok())
            .collect()
    }

    /// Image URLs from `<img>` tags and from links to image files
    ///
    /// Both are resolved against the page the post came from.
    pub fn image_urls(&self) -> BTreeSet<Url> {
        let mut urls: BTreeSet<Url> = self
            .image_refs
            .iter()
            .filter_map(|src| resolve_href(&self.page_url, src).ok())
            .collect();

        urls.extend(
            self.link_hrefs
                .iter()
                .filter_map(|href| resolve_href(&self.page_url, href).ok())
                .filter(has_image_extension),
        );

        urls
    }
}

/// Everything the crawl core needs from one fetched thread page
#[derive(Debug, Clone)]
pub struct ThreadPage {
    pub url: Url,
    pub title: Option<String>,
    pub pagination_hrefs: Vec<String>,
    pub posts: Vec<PostContainer>,
}

impl ThreadPage {
    /// The thread title, or [`UNKNOWN_TITLE`]
    pub fn title_or_placeholder(&self) -> String {
        self.title
            .clone()
            .unwrap_or_else(|| UNKNOWN_TITLE.to_string())
    }

    /// The original poster: the first post with a recognizable poster name
    pub fn author(&self) -> Option<&str> {
        self.posts
            .iter()
            .map(|post| post.poster.as_str())
            .find(|name| !name.is_empty())
    }

    /// Pagination links resolved against this page, invalid ones dropped
    pub fn pagination_links(&self) -> Vec<Url> {
        self.pagination_hrefs
            .iter()
            .filter_map(|href| resolve_href(&self.url, href).ok())
            .collect()
    }

    /// Consumes the page, keeping only bodied posts written by `author`
    pub fn into_posts_by(self, author: &str) -> Vec<PostContainer> {
        self.posts
            .into_iter()
            .filter(|post| post.has_body && post.is_by(author))
            .collect()
    }
}

/// Capability that reads thread pages
///
/// Implementations hold the markup knowledge; the assembler only sees
/// [`ThreadPage`] values.
pub trait PageReader {
    fn read_page(&self, html: &str, page_url: &Url) -> ThreadPage;
}

/// Compiled selectors for Discuz!-style forum markup
#[derive(Debug, Clone)]
pub struct DiscuzReader {
    titles: Vec<Selector>,
    post: Selector,
    author_link: Selector,
    marker: Selector,
    body: Selector,
    link: Selector,
    image: Selector,
    pagination: Selector,
}

impl Default for DiscuzReader {
    fn default() -> Self {
        Self::new()
    }
}

impl DiscuzReader {
    pub fn new() -> Self {
        Self {
            titles: TITLE_STRATEGIES.iter().map(|s| selector(s)).collect(),
            post: selector("table.plhin"),
            author_link: selector("div.authi a.xw1"),
            marker: selector("em"),
            body: selector("td.t_f"),
            link: selector("a[href]"),
            image: selector("img"),
            pagination: selector("div.pgs a[href]"),
        }
    }

    fn extract_title(&self, document: &Html) -> Option<String> {
        self.titles.iter().find_map(|sel| {
            document
                .select(sel)
                .next()
                .map(collapse_text)
                .filter(|s| !s.is_empty())
        })
    }

    fn extract_pagination(&self, document: &Html) -> Vec<String> {
        document
            .select(&self.pagination)
            .filter_map(|a| a.value().attr("href"))
            .map(str::to_string)
            .collect()
    }

    /// Reads one post; posts without a poster link are not posts we can attribute
    fn extract_post(&self, post: ElementRef<'_>, page_url: &Url) -> Option<PostContainer> {
        let poster = post
            .select(&self.author_link)
            .next()
            .map(collapse_text)
            .filter(|name| !name.is_empty())?;

        let op_marker = post.select(&self.marker).any(|em| {
            let text = collapse_text(em);
            OP_MARKERS.contains(&text.as_str())
        });

        let mut text = String::new();
        let mut link_hrefs = Vec::new();
        let mut image_refs = Vec::new();
        let body = post.select(&self.body).next();

        if let Some(body) = body {
            text = body_text(body);
            link_hrefs = body
                .select(&self.link)
                .filter_map(|a| a.value().attr("href"))
                .map(str::to_string)
                .collect();
            image_refs = body
                .select(&self.image)
                .filter_map(|img| {
                    IMAGE_ATTRIBUTES
                        .iter()
                        .filter_map(|attr| img.value().attr(attr))
                        .find(|value| !value.trim().is_empty())
                })
                .map(str::to_string)
                .collect();
        }

        Some(PostContainer {
            poster,
            op_marker,
            text,
            link_hrefs,
            image_refs,
            has_body: body.is_some(),
            page_url: page_url.clone(),
        })
    }
}

impl PageReader for DiscuzReader {
    fn read_page(&self, html: &str, page_url: &Url) -> ThreadPage {
        let document = Html::parse_document(html);

        let posts = document
            .select(&self.post)
            .filter_map(|post| self.extract_post(post, page_url))
            .collect();

        ThreadPage {
            url: page_url.clone(),
            title: self.extract_title(&document),
            pagination_hrefs: self.extract_pagination(&document),
            posts,
        }
    }
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid built-in selector {css}: {e:?}"))
}

/// Joins an element's text nodes and trims the result
fn collapse_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Text nodes, each trimmed, empty ones dropped, one per line
fn body_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn has_image_extension(url: &Url) -> bool {
    url.path()
        .rsplit_once('.')
        .map(|(_, ext)| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}
