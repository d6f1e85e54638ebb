//! URL handling module for Forum-Ripple
//!
//! This module provides URL normalization, href resolution, origin comparison
//! and recognition of thread first-page URLs.

mod domain;
mod matcher;
mod normalize;

// Re-export main functions
pub use domain::Origin;
pub use matcher::{is_thread_first_page, page_number, thread_id};
pub use normalize::{is_followable_href, normalize_parsed, normalize_url, resolve_href};
