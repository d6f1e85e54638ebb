//! Visited registry
//!
//! The set of thread URLs already dispatched during one crawl run. It only
//! grows; nothing is ever removed, so a URL is processed at most once.

use std::collections::HashSet;
use url::Url;

/// Run-scoped record of dispatched thread URLs
///
/// Owned by the coordinator; independent runs use independent registries.
/// URLs must be normalized before they reach the registry.
#[derive(Debug, Default)]
pub struct VisitedRegistry {
    visited: HashSet<Url>,
}

impl VisitedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tests membership and inserts in one step
    ///
    /// Returns true iff the URL was not present before the call.
    pub fn mark_if_new(&mut self, url: &Url) -> bool {
        self.visited.insert(url.clone())
    }

    pub fn contains(&self, url: &Url) -> bool {
        self.visited.contains(url)
    }

    pub fn len(&self) -> usize {
        self.visited.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visited.is_empty()
    }
}
