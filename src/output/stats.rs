//! Run statistics
//!
//! The coordinator keeps a [`CrawlReport`] while it works and prints it when
//! the traversal is exhausted.

use crate::state::VisitOutcome;
use chrono::{DateTime, Utc};

/// Counters for one crawl run
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,

    pub threads_archived: u64,
    pub threads_abandoned: u64,
    pub threads_depth_exceeded: u64,
    pub threads_skipped: u64,

    /// Threads archived with at least one page missing
    pub threads_partial: u64,

    pub posts_saved: u64,
    pub images_saved: u64,
    pub images_failed: u64,
    pub pages_failed: u64,
    pub write_failures: u64,

    /// Deepest level at which a thread was archived
    pub max_depth_reached: u32,
}

impl Default for CrawlReport {
    fn default() -> Self {
        Self::new()
    }
}

impl CrawlReport {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            threads_archived: 0,
            threads_abandoned: 0,
            threads_depth_exceeded: 0,
            threads_skipped: 0,
            threads_partial: 0,
            posts_saved: 0,
            images_saved: 0,
            images_failed: 0,
            pages_failed: 0,
            write_failures: 0,
            max_depth_reached: 0,
        }
    }

    /// Counts a finished visit
    pub fn record(&mut self, outcome: VisitOutcome, depth: u32) {
        match outcome {
            VisitOutcome::Archived => {
                self.threads_archived += 1;
                self.max_depth_reached = self.max_depth_reached.max(depth);
            }
            VisitOutcome::Abandoned => self.threads_abandoned += 1,
            VisitOutcome::DepthExceeded => self.threads_depth_exceeded += 1,
            VisitOutcome::Skipped => self.threads_skipped += 1,
        }
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Number of threads that were assembled or attempted
    pub fn threads_attempted(&self) -> u64 {
        self.threads_archived + self.threads_abandoned
    }

    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }
}

/// Prints the report to stdout in a formatted manner
pub fn print_report(report: &CrawlReport) {
    println!("=== Crawl Report ===\n");

    println!("Threads:");
    println!("  Attempted: {}", report.threads_attempted());
    println!("  Archived: {}", report.threads_archived);
    println!("    of which partial: {}", report.threads_partial);
    println!("  Abandoned: {}", report.threads_abandoned);
    println!("  Beyond max depth: {}", report.threads_depth_exceeded);
    println!("  Already visited: {}", report.threads_skipped);
    println!("  Deepest archived level: {}", report.max_depth_reached);
    println!();

    println!("Content:");
    println!("  Posts saved: {}", report.posts_saved);
    println!("  Images saved: {}", report.images_saved);
    println!("  Images failed: {}", report.images_failed);
    println!("  Pages failed: {}", report.pages_failed);
    println!("  Write failures: {}", report.write_failures);
    println!();

    println!("Started: {}", report.started_at.to_rfc3339());
    if let Some(finished) = report.finished_at {
        println!("Finished: {}", finished.to_rfc3339());
    }
    if let Some(seconds) = report.duration_seconds() {
        println!("Duration: {}s", seconds);
    }
}
