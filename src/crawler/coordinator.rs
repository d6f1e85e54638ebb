//! Crawler coordinator - recursive thread crawl orchestration
//!
//! For each candidate thread URL the coordinator:
//! 1. Marks it in the visited registry (or skips it if already there)
//! 2. Stops at the depth bound
//! 3. Assembles the thread across all its pages
//! 4. Archives images and text
//! 5. Extracts links to other threads and visits each at depth + 1
//!
//! Traversal is depth-first: a thread and all of its descendants finish
//! before the next sibling starts.

use crate::config::Config;
use crate::crawler::assembler::{assemble, AggregatedThread, Assembly};
use crate::crawler::fetcher::{HttpFetcher, PageSource};
use crate::crawler::links::extract_new_threads;
use crate::crawler::parser::{DiscuzReader, PageReader};
use crate::crawler::registry::VisitedRegistry;
use crate::output::{CrawlReport, FsArchiver, ThreadArchiver};
use crate::state::VisitOutcome;
use crate::url::{normalize_parsed, thread_id, Origin};
use crate::RippleError;
use std::future::Future;
use std::pin::Pin;
use tracing::Instrument;
use url::Url;

/// Main crawler coordinator structure
pub struct Coordinator<S, R, A> {
    source: S,
    reader: R,
    archiver: A,
    registry: VisitedRegistry,
    max_depth: u32,
    allowed_origin: Option<Origin>,
    report: CrawlReport,
}

/// Coordinator wired to the network, Discuz markup and the filesystem
pub type HttpCoordinator = Coordinator<HttpFetcher, DiscuzReader, FsArchiver<HttpFetcher>>;

impl HttpCoordinator {
    /// Creates a coordinator from configuration
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    /// * `allowed_origin` - Origin of the first seed, if any
    ///
    /// # Returns
    ///
    /// * `Ok(HttpCoordinator)` - Ready to run
    /// * `Err(RippleError)` - The HTTP client could not be built
    pub fn from_config(config: &Config, allowed_origin: Option<Origin>) -> Result<Self, RippleError> {
        let fetcher = HttpFetcher::from_config(config)?;
        let archiver = FsArchiver::new(
            &config.output.archive_dir,
            config.output.text_file_name.clone(),
            fetcher.clone(),
        );

        Ok(Coordinator::new(
            fetcher,
            DiscuzReader::new(),
            archiver,
            config.crawler.max_depth,
            allowed_origin,
        ))
    }
}

impl<S, R, A> Coordinator<S, R, A>
where
    S: PageSource,
    R: PageReader,
    A: ThreadArchiver,
{
    pub fn new(
        source: S,
        reader: R,
        archiver: A,
        max_depth: u32,
        allowed_origin: Option<Origin>,
    ) -> Self {
        Self {
            source,
            reader,
            archiver,
            registry: VisitedRegistry::new(),
            max_depth,
            allowed_origin,
            report: CrawlReport::new(),
        }
    }

    pub fn registry(&self) -> &VisitedRegistry {
        &self.registry
    }

    /// Crawls every seed at depth 0, in order, and returns the run report
    pub async fn run(&mut self, seeds: &[Url]) -> CrawlReport {
        tracing::info!(
            "Starting crawl: {} seeds, max depth {}, allowed origin {}",
            seeds.len(),
            self.max_depth,
            self.allowed_origin
                .as_ref()
                .map_or_else(|| "(any)".to_string(), Origin::to_string)
        );

        for seed in seeds {
            match normalize_parsed(seed.clone()) {
                Ok(seed) => {
                    self.visit(seed, 0).await;
                }
                Err(e) => tracing::warn!("Ignoring seed {}: {}", seed, e),
            }
        }

        self.report.finish();
        tracing::info!(
            "Crawl complete: {} archived, {} abandoned, {} beyond depth, {} already visited",
            self.report.threads_archived,
            self.report.threads_abandoned,
            self.report.threads_depth_exceeded,
            self.report.threads_skipped
        );

        self.report.clone()
    }

    /// Visits one normalized thread URL at the given depth
    ///
    /// Boxed so the traversal can recurse into linked threads.
    pub fn visit<'a>(
        &'a mut self,
        url: Url,
        depth: u32,
    ) -> Pin<Box<dyn Future<Output = VisitOutcome> + 'a>> {
        let span = tracing::info_span!("thread", depth, id = ?thread_id(&url));
        Box::pin(
            async move {
                let outcome = self.process_thread(url, depth).await;
                tracing::debug!("Visit finished: {}", outcome);
                self.report.record(outcome, depth);
                outcome
            }
            .instrument(span),
        )
    }

    async fn process_thread(&mut self, url: Url, depth: u32) -> VisitOutcome {
        if !self.registry.mark_if_new(&url) {
            tracing::debug!("Already visited, skipping {}", url);
            return VisitOutcome::Skipped;
        }

        if depth > self.max_depth {
            tracing::info!("Depth limit exceeded, skipping {}", url);
            return VisitOutcome::DepthExceeded;
        }

        tracing::info!("Processing thread: {}", url);
        let thread = match assemble(&self.source, &self.reader, &url).await {
            Assembly::Assembled(thread) => thread,
            Assembly::Abandoned(reason) => {
                tracing::warn!("Abandoning {}: {}", url, reason);
                return VisitOutcome::Abandoned;
            }
        };

        self.archive(&thread).await;

        let links = extract_new_threads(&thread.posts, &thread.url, self.allowed_origin.as_ref());
        tracing::info!(
            "Completed: {} ({} posts, {} images, {} linked threads)",
            thread.title,
            thread.posts.len(),
            thread.image_urls.len(),
            links.len()
        );
        drop(thread);

        for link in links {
            tracing::info!("Following link: {}", link);
            self.visit(link, depth + 1).await;
        }

        VisitOutcome::Archived
    }

    /// Downloads images, then writes text; failures are logged and counted
    async fn archive(&mut self, thread: &AggregatedThread) {
        let destination = self.archiver.destination(&thread.title);
        tracing::info!(
            "Archiving {} images and {} posts to {}",
            thread.image_urls.len(),
            thread.posts.len(),
            destination.display()
        );

        let images = self
            .archiver
            .persist_images(&thread.image_urls, &destination)
            .await;
        self.report.images_saved += images.saved.len() as u64;
        self.report.images_failed += images.failed.len() as u64;

        match self.archiver.persist_text(&thread.posts, &destination).await {
            Ok(path) => {
                tracing::info!("Saved original poster text: {}", path.display());
                self.report.posts_saved += thread.posts.len() as u64;
            }
            Err(e) => {
                tracing::error!("Failed to save text for {}: {}", thread.url, e);
                self.report.write_failures += 1;
            }
        }

        if thread.is_partial() {
            self.report.threads_partial += 1;
            self.report.pages_failed += thread.failed_pages.len() as u64;
        }
    }
}
