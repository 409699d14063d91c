//! Configuration module for Wordcrawl
//!
//! A crawl is driven by a single immutable [`CrawlConfig`]. It starts from the
//! built-in defaults, may be overlaid by a TOML file, and is finally overlaid by
//! command-line flags.
//!
//! # Example
//!
//! ```no_run
//! use wordcrawl::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("wordcrawl.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{ConfigFile, CrawlConfig, CrawlerSection, DEFAULT_REQUEST_TIMEOUT, DEFAULT_USER_AGENT};

// Re-export parser functions
pub use parser::{load_config, load_config_file, parse_config};
pub use validation::validate;
