//! Filesystem archiver
//!
//! Writes one folder per thread, named from the sanitized thread title, with
//! the original poster's text in a single file and images as `img_<n>.<ext>`.

use crate::crawler::{PageSource, PostContainer, UNKNOWN_TITLE};
use crate::output::traits::{ArchiveError, ImageDownloadError, ImageReport, ThreadArchiver};
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use url::Url;

/// Longest folder name produced from a title, in characters
pub const MAX_FOLDER_CHARS: usize = 60;

/// Characters that are unsafe in file names on common filesystems
const UNSAFE_CHARS: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// Extension used when an image URL does not carry a usable one
const FALLBACK_EXTENSION: &str = "bin";

/// Turns a thread title into a folder name that is stable across runs
///
/// Unsafe and control characters become `_`, surrounding whitespace is
/// trimmed and the result is capped at [`MAX_FOLDER_CHARS`] characters.
/// Titles that end up empty or made only of dots fall back to
/// [`UNKNOWN_TITLE`].
///
/// # Examples
///
/// ```
/// use forum_ripple::output::sanitize_folder_name;
///
/// assert_eq!(sanitize_folder_name(" A/B: c? "), "A_B_ c_");
/// assert_eq!(sanitize_folder_name(".."), "unknown_title");
/// ```
pub fn sanitize_folder_name(title: &str) -> String {
    let replaced: String = title
        .chars()
        .map(|c| {
            if UNSAFE_CHARS.contains(&c) || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();

    let capped: String = replaced.trim().chars().take(MAX_FOLDER_CHARS).collect();
    let capped = capped.trim_end().to_string();

    if capped.is_empty() || capped.chars().all(|c| c == '.') {
        UNKNOWN_TITLE.to_string()
    } else {
        capped
    }
}

/// Picks the file extension for a downloaded image from its URL path
pub fn image_extension(url: &Url) -> String {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| {
            !ext.is_empty() && ext.len() <= 5 && ext.chars().all(|c| c.is_ascii_alphanumeric())
        })
        .unwrap_or_else(|| FALLBACK_EXTENSION.to_string())
}

/// Renders posts as numbered sections
pub fn format_posts_text(posts: &[PostContainer]) -> String {
    let mut text = String::new();
    for (index, post) in posts.iter().enumerate() {
        text.push_str(&format!("------ OP post {} ------\n", index + 1));
        text.push_str(&post.text);
        text.push_str("\n\n");
    }
    text
}

/// [`ThreadArchiver`] writing under a root directory
///
/// Images are downloaded through the same [`PageSource`] the crawl uses.
#[derive(Debug, Clone)]
pub struct FsArchiver<S> {
    root: PathBuf,
    text_file_name: String,
    source: S,
}

impl<S: PageSource> FsArchiver<S> {
    pub fn new(root: impl Into<PathBuf>, text_file_name: impl Into<String>, source: S) -> Self {
        Self {
            root: root.into(),
            text_file_name: text_file_name.into(),
            source,
        }
    }

    async fn ensure_dir(path: &Path) -> Result<(), ArchiveError> {
        tokio::fs::create_dir_all(path)
            .await
            .map_err(|source| ArchiveError::CreateDir {
                path: path.to_path_buf(),
                source,
            })
    }
}

#[async_trait]
impl<S: PageSource> ThreadArchiver for FsArchiver<S> {
    fn destination(&self, title: &str) -> PathBuf {
        self.root.join(sanitize_folder_name(title))
    }

    async fn persist_text(
        &self,
        posts: &[PostContainer],
        destination: &Path,
    ) -> Result<PathBuf, ArchiveError> {
        Self::ensure_dir(destination).await?;

        let path = destination.join(&self.text_file_name);
        tokio::fs::write(&path, format_posts_text(posts))
            .await
            .map_err(|source| ArchiveError::Write {
                path: path.clone(),
                source,
            })?;

        Ok(path)
    }

    async fn persist_images(
        &self,
        image_urls: &BTreeSet<Url>,
        destination: &Path,
    ) -> ImageReport {
        let mut report = ImageReport::default();

        if let Err(e) = Self::ensure_dir(destination).await {
            let reason = e.to_string();
            report.failed = image_urls
                .iter()
                .map(|url| ImageDownloadError {
                    url: url.to_string(),
                    reason: reason.clone(),
                })
                .collect();
            return report;
        }

        for (index, url) in image_urls.iter().enumerate() {
            let bytes = match self.source.fetch_bytes(url).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::warn!("Image download failed: {} ({})", url, e);
                    report.failed.push(ImageDownloadError {
                        url: url.to_string(),
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            let path = destination.join(format!("img_{}.{}", index + 1, image_extension(url)));
            match tokio::fs::write(&path, &bytes).await {
                Ok(()) => {
                    tracing::info!("Saved image: {}", path.display());
                    report.saved.push(path);
                }
                Err(e) => {
                    tracing::warn!("Image write failed: {} ({})", path.display(), e);
                    report.failed.push(ImageDownloadError {
                        url: url.to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        report
    }
}
