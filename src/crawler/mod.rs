//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - The HTTP capability and its reqwest implementation
//! - Body isolation, word/number counting and link extraction
//! - The shared work queue and completion detection
//! - Overall crawl coordination

mod analyzer;
mod completion;
mod coordinator;
mod fetcher;
mod parser;
mod scheduler;

pub use analyzer::{
    analyze, count_words_and_numbers, is_number, isolate_body, prepare_body, visible_text,
    PageProcessor, PatternProcessor, ProcessedPage, TokenCounts,
};
pub use completion::{Completion, CompletionSummary, CompletionTracker};
pub use coordinator::{CrawlReport, Crawler};
pub use fetcher::{build_http_client, FetchedPage, HttpClient, ReqwestFetcher};
pub use parser::extract_links;
pub use scheduler::{WorkItem, WorkQueue};
