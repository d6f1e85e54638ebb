//! In-memory forum used by the crawler unit tests

use crate::crawler::fetcher::{FetchError, PageSource};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use url::Url;

/// A site whose pages and images live in maps; everything else is a 404
#[derive(Debug, Default)]
pub struct FakeSite {
    pages: HashMap<String, String>,
    images: HashMap<String, Vec<u8>>,
    fetched: Mutex<Vec<String>>,
}

impl FakeSite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, html: String) -> Self {
        self.pages.insert(url.to_string(), html);
        self
    }

    pub fn image(mut self, url: &str, bytes: &[u8]) -> Self {
        self.images.insert(url.to_string(), bytes.to_vec());
        self
    }

    /// Every URL requested so far, in request order
    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }

    /// How many times a URL was requested
    pub fn fetch_count(&self, url: &str) -> usize {
        self.fetched().iter().filter(|u| u.as_str() == url).count()
    }

    fn record(&self, url: &Url) {
        self.fetched.lock().unwrap().push(url.to_string());
    }

    fn not_found(url: &Url) -> FetchError {
        FetchError::Status {
            url: url.to_string(),
            status: 404,
        }
    }
}

#[async_trait]
impl PageSource for FakeSite {
    async fn fetch_page(&self, url: &Url) -> Result<String, FetchError> {
        self.record(url);
        self.pages
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| Self::not_found(url))
    }

    async fn fetch_bytes(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        self.record(url);
        self.images
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| Self::not_found(url))
    }
}

/// A post for [`thread_html`]: poster, OP badge, body markup
pub struct Post<'a>(pub &'a str, pub bool, pub &'a str);

/// Renders a Discuz-style thread page
pub fn thread_html(title: &str, posts: &[Post<'_>], pagination: &[&str]) -> String {
    let mut html = format!(
        r#"<html><head><title>{title} - Forum</title></head><body>
        <span id="thread_subject">{title}</span>"#
    );

    if !pagination.is_empty() {
        html.push_str(r#"<div class="pgs"><div class="pg">"#);
        for (i, href) in pagination.iter().enumerate() {
            html.push_str(&format!(r#"<a href="{}">{}</a>"#, href, i + 2));
        }
        html.push_str("</div></div>");
    }

    for Post(name, marker, body) in posts {
        let em = if *marker { "<em>楼主</em>" } else { "" };
        html.push_str(&format!(
            r#"<table class="plhin"><tr><td class="pls">
            <div class="authi"><a class="xw1" href="space.html">{name}</a>{em}</div>
            </td><td class="t_f">{body}</td></tr></table>"#
        ));
    }

    html.push_str("</body></html>");
    html
}

/// A page with posts but no attributable poster
pub fn anonymous_html(title: &str) -> String {
    format!(
        r#"<html><head><title>{title}</title></head><body>
        <table class="plhin"><tr><td class="t_f">guest post</td></tr></table>
        </body></html>"#
    )
}

pub fn url(s: &str) -> Url {
    Url::parse(s).unwrap()
}
