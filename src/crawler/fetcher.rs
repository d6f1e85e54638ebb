//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients from the user agent and HTTP configuration
//! - GET requests for thread pages (decoded to text)
//! - GET requests for image bytes
//! - Error classification into [`FetchError`]
//!
//! Nothing here retries: a failed request is reported once and the caller
//! decides whether that abandons a thread, a page or a single image.

use crate::config::Config;
use async_trait::async_trait;
use encoding_rs::{Encoding, UTF_8};
use regex::bytes::Regex;
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::{Client, Proxy, Response};
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Failure to fetch a URL
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Connection failed for {url}: {message}")]
    Connect { url: String, message: String },

    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },
}

impl FetchError {
    /// Classifies a reqwest error the same way for pages and images
    fn from_reqwest(url: &Url, error: reqwest::Error) -> Self {
        let url = url.to_string();
        if error.is_timeout() {
            FetchError::Timeout { url }
        } else if error.is_connect() {
            FetchError::Connect {
                url,
                message: error.to_string(),
            }
        } else {
            FetchError::Network {
                url,
                message: error.to_string(),
            }
        }
    }
}

/// Source of fetched documents
///
/// The crawl core only ever talks to this trait, so it can run against an
/// in-memory site in tests.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetches a page and returns its decoded HTML
    async fn fetch_page(&self, url: &Url) -> Result<String, FetchError>;

    /// Fetches raw bytes (used for images)
    async fn fetch_bytes(&self, url: &Url) -> Result<Vec<u8>, FetchError>;
}

#[async_trait]
impl<T: PageSource + ?Sized> PageSource for Arc<T> {
    async fn fetch_page(&self, url: &Url) -> Result<String, FetchError> {
        (**self).fetch_page(url).await
    }

    async fn fetch_bytes(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        (**self).fetch_bytes(url).await
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The crawler configuration (user agent, timeouts, proxy)
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client (e.g. bad proxy URL)
///
/// # Example
///
/// ```no_run
/// use forum_ripple::config::Config;
/// use forum_ripple::crawler::build_http_client;
///
/// let client = build_http_client(&Config::default()).unwrap();
/// ```
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder()
        .user_agent(config.user_agent.value.clone())
        .timeout(Duration::from_secs(config.http.timeout_secs))
        .connect_timeout(Duration::from_secs(config.http.connect_timeout_secs))
        .gzip(true)
        .brotli(true);

    if let Some(proxy) = &config.http.proxy {
        builder = builder.proxy(Proxy::all(proxy)?);
    }

    builder.build()
}

/// [`PageSource`] backed by a reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    image_timeout: Duration,
}

impl HttpFetcher {
    pub fn new(client: Client, image_timeout: Duration) -> Self {
        Self {
            client,
            image_timeout,
        }
    }

    /// Builds the client from configuration and wraps it
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let client = build_http_client(config)?;
        Ok(Self::new(
            client,
            Duration::from_secs(config.http.image_timeout_secs),
        ))
    }

    /// Rejects non-success responses
    fn check_status(url: &Url, response: Response) -> Result<Response, FetchError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            })
        }
    }
}

#[async_trait]
impl PageSource for HttpFetcher {
    async fn fetch_page(&self, url: &Url) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;
        let response = Self::check_status(url, response)?;

        let header_charset = content_type_charset(response.headers());
        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;
        Ok(decode_page(&bytes, header_charset.as_deref()))
    }

    async fn fetch_bytes(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .timeout(self.image_timeout)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;
        let response = Self::check_status(url, response)?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;
        Ok(bytes.to_vec())
    }
}

/// How far into a document a `<meta>` charset declaration is looked for
const META_SNIFF_BYTES: usize = 4096;

fn meta_charset_regex() -> &'static Regex {
    static META_CHARSET: OnceLock<Regex> = OnceLock::new();
    META_CHARSET.get_or_init(|| {
        Regex::new(r#"(?i-u)<meta[^>]*?charset\s*=\s*["']?\s*([a-z0-9_:.\-]+)"#)
            .expect("meta charset pattern is valid")
    })
}

/// The `charset` parameter of the Content-Type header, if any
fn content_type_charset(headers: &HeaderMap) -> Option<String> {
    let content_type = headers.get(CONTENT_TYPE)?.to_str().ok()?;
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        name.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches(|c: char| c == '"' || c == '\'').to_string())
    })
}

/// The charset declared by a `<meta>` tag near the top of the document
fn sniff_meta_charset(bytes: &[u8]) -> Option<&'static Encoding> {
    let head = &bytes[..bytes.len().min(META_SNIFF_BYTES)];
    let label = meta_charset_regex().captures(head)?.get(1)?;
    Encoding::for_label(label.as_bytes())
}

/// Decodes a page body to text
///
/// The encoding is taken from the Content-Type charset, then from a
/// `<meta>` declaration, then defaults to UTF-8. A byte-order mark wins over
/// all of them. Malformed sequences become U+FFFD.
pub fn decode_page(bytes: &[u8], header_charset: Option<&str>) -> String {
    let encoding = header_charset
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .or_else(|| sniff_meta_charset(bytes))
        .unwrap_or(UTF_8);
    let (text, _, _) = encoding.decode(bytes);
    text.into_owned()
}
