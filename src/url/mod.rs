//! URL handling module for Wordcrawl
//!
//! This module turns raw `href` values into canonical same-host URLs and
//! extracts the crawl host from the seed URL.

mod domain;
mod normalize;

// Re-export main functions
pub use domain::{extract_authority, parse_seed, with_default_scheme};
pub use normalize::{normalize, CANONICAL_SCHEME};
