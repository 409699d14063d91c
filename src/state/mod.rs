//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `VisitedStore`: the shared URL → result map that gates every fetch
//! - `PageResult`: word and number counts for one page
//! - `WorkState`: the lifecycle of a single work item

mod page_state;
mod visited;

// Re-export main types
pub use page_state::WorkState;
pub use visited::{PageResult, VisitedStore};
