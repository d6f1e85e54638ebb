//! Output module for archiving threads and reporting on a run
//!
//! This module handles:
//! - Writing the original poster's text per thread
//! - Downloading the thread's images next to it
//! - Recording and printing run statistics

mod archive;
pub mod stats;
mod traits;

pub use archive::{
    format_posts_text, image_extension, sanitize_folder_name, FsArchiver, MAX_FOLDER_CHARS,
};
pub use stats::{print_report, CrawlReport};
pub use traits::{ArchiveError, ImageDownloadError, ImageReport, ThreadArchiver};
