//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `VisitOutcome`: the terminal state a thread URL ends in (archived, abandoned,
//!   depth exceeded, skipped)

mod visit_outcome;

pub use visit_outcome::VisitOutcome;
