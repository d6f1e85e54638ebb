//! Crawler module for thread fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the [`PageSource`] trait
//! - Reading thread pages (title, original poster, posts, pagination)
//! - Assembling a thread's original-poster content across its pages
//! - Extracting links to other threads
//! - The visited registry and the recursive coordinator

mod assembler;
mod coordinator;
mod fetcher;
mod links;
mod parser;
mod registry;

#[cfg(test)]
pub(crate) mod testing;

pub use assembler::{assemble, thread_pages, AbandonReason, AggregatedThread, Assembly};
pub use coordinator::{Coordinator, HttpCoordinator};
pub use fetcher::{build_http_client, decode_page, FetchError, HttpFetcher, PageSource};
pub use links::extract_new_threads;
pub use parser::{DiscuzReader, PageReader, PostContainer, ThreadPage, UNKNOWN_TITLE};
pub use registry::VisitedRegistry;

use crate::config::{Config, SeedList};
use crate::output::CrawlReport;
use crate::RippleError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP client and filesystem archiver
/// 2. Restrict discovery to the first seed's origin
/// 3. Crawl every seed depth-first
/// 4. Return the run report
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `seeds` - The seed thread URLs
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Traversal finished
/// * `Err(RippleError)` - The crawler could not be set up
pub async fn crawl(config: &Config, seeds: &SeedList) -> Result<CrawlReport, RippleError> {
    let mut coordinator = HttpCoordinator::from_config(config, seeds.allowed_origin())?;
    Ok(coordinator.run(&seeds.urls).await)
}
