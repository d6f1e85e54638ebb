//! Archiver trait and types
//!
//! This module defines the interface the coordinator uses to persist an
//! assembled thread, along with its error and report types.

use crate::crawler::PostContainer;
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

/// Errors that can occur while writing archive output
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// A single image that could not be saved
#[derive(Debug, Error)]
#[error("Image {url} failed: {reason}")]
pub struct ImageDownloadError {
    pub url: String,
    pub reason: String,
}

/// Outcome of an image batch; failures never abort the batch
#[derive(Debug, Default)]
pub struct ImageReport {
    /// Files written, in download order
    pub saved: Vec<PathBuf>,

    pub failed: Vec<ImageDownloadError>,
}

impl ImageReport {
    pub fn attempted(&self) -> usize {
        self.saved.len() + self.failed.len()
    }
}

/// Persists assembled threads
#[async_trait]
pub trait ThreadArchiver: Send + Sync {
    /// Deterministic folder for a thread title
    fn destination(&self, title: &str) -> PathBuf;

    /// Writes the original poster's posts as text
    ///
    /// Returns the path of the written file.
    async fn persist_text(
        &self,
        posts: &[PostContainer],
        destination: &Path,
    ) -> Result<PathBuf, ArchiveError>;

    /// Downloads every image into `destination`
    async fn persist_images(&self, image_urls: &BTreeSet<Url>, destination: &Path)
        -> ImageReport;
}
