//! Configuration module for Forum-Ripple
//!
//! This module handles loading, parsing, and validating the TOML configuration
//! file and the line-delimited seed list.
//!
//! # Example
//!
//! ```no_run
//! use forum_ripple::config::{load_config, load_seeds};
//! use std::path::Path;
//!
//! let config = load_config(Path::new("ripple.toml")).unwrap();
//! let seeds = load_seeds(Path::new(&config.crawler.seeds_path)).unwrap();
//! println!("{} seeds, max depth {}", seeds.len(), config.crawler.max_depth);
//! ```

mod parser;
mod seeds;
mod types;
mod validation;

// Re-export types
pub use seeds::SeedList;
pub use types::{Config, CrawlerConfig, HttpConfig, OutputConfig, UserAgentConfig};
pub use validation::{validate, MAX_DEPTH_LIMIT};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use seeds::{load_seeds, parse_seeds};
