//! Output module for printing crawl results
//!
//! This module handles:
//! - The per-page report lines written to stdout
//! - The verbose summary (visit count, totals, duration)
//! - Crawl statistics derived from a report

pub mod stats;

pub use stats::CrawlStatistics;

use crate::crawler::CrawlReport;
use crate::url::CANONICAL_SCHEME;
use std::io::{self, Write};

/// Writes the crawl report
///
/// One line per visited URL, ordered by URL:
/// `host<TAB><TAB>words<TAB>numbers<TAB><TAB>path`. The root page has an empty
/// path. In verbose mode the lines are preceded by the number of completed
/// items and followed by the totals and the elapsed time.
///
/// # Arguments
///
/// * `out` - Destination, usually stdout
/// * `report` - The finished crawl
/// * `verbose` - Whether to add the summary lines
pub fn write_report<W: Write>(out: &mut W, report: &CrawlReport, verbose: bool) -> io::Result<()> {
    let stats = CrawlStatistics::from_report(report);

    if verbose {
        writeln!(out, "Visited: {} URLS", stats.items_completed)?;
    }

    for (url, page) in &report.pages {
        writeln!(
            out,
            "{}\t\t{}\t{}\t\t{}",
            report.host,
            page.word_count,
            page.number_count,
            page_path(url, &report.host)
        )?;
    }

    if verbose {
        writeln!(
            out,
            "Found {} words and {} numbers for base URL {} with depth {}",
            stats.total_words, stats.total_numbers, report.seed, report.max_depth
        )?;
        writeln!(out, "Execution duration: {:?}", report.elapsed)?;
        if report.cancelled {
            writeln!(
                out,
                "Crawl interrupted: {} of {} items completed",
                report.items_completed, report.items_produced
            )?;
        }
    }

    Ok(())
}

/// Path component of a canonical URL on `host`
fn page_path<'a>(url: &'a str, host: &str) -> &'a str {
    url.strip_prefix(CANONICAL_SCHEME)
        .and_then(|rest| rest.strip_prefix("://"))
        .and_then(|rest| rest.strip_prefix(host))
        .unwrap_or(url)
}
