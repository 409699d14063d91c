//! Statistics derived from a finished crawl
//!
//! This module folds the per-page results of a [`CrawlReport`] into the totals
//! shown by the verbose report.

use crate::crawler::CrawlReport;

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStatistics {
    /// Sum of word counts over every visited page
    pub total_words: usize,

    /// Sum of number counts over every visited page
    pub total_numbers: usize,

    /// Number of claimed URLs (fetched, failed or pruned)
    pub pages_visited: usize,

    /// Pages whose fetch failed
    pub pages_failed: usize,

    /// Work items a worker finished, duplicates included
    pub items_completed: usize,
}

impl CrawlStatistics {
    /// Computes totals from a crawl report
    ///
    /// # Arguments
    ///
    /// * `report` - The report returned by the crawler
    pub fn from_report(report: &CrawlReport) -> Self {
        let (total_words, total_numbers) = report
            .pages
            .values()
            .fold((0, 0), |(words, numbers), page| {
                (words + page.word_count, numbers + page.number_count)
            });

        Self {
            total_words,
            total_numbers,
            pages_visited: report.pages.len(),
            pages_failed: report.items_failed,
            items_completed: report.items_completed,
        }
    }
}
