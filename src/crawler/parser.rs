//! Link extractor
//!
//! Finds every `href="..."` attribute in an HTML fragment by pattern matching on
//! the raw text. Malformed markup is tolerated: anything between `href="` and the
//! next `"` is a candidate. Candidates go through [`normalize`]; rejected ones are
//! dropped silently.

use crate::url::normalize;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

static HREF_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"href="([^"]*)""#).unwrap());

/// Extracts the distinct same-host URLs referenced by a fragment
///
/// URLs that are already visited are still returned; de-duplication against the
/// visited store happens when a worker claims the URL.
///
/// # Arguments
///
/// * `fragment` - HTML text, typically the prepared page body
/// * `host` - The crawl authority links must resolve to
///
/// # Example
///
/// ```
/// use wordcrawl::crawler::extract_links;
///
/// let links = extract_links(r#"<a href="/about">About</a>"#, "example.com");
/// assert!(links.contains("https://example.com/about"));
/// ```
pub fn extract_links(fragment: &str, host: &str) -> BTreeSet<String> {
    let mut links = BTreeSet::new();

    for captures in HREF_RE.captures_iter(fragment) {
        let Some(href) = captures.get(1) else {
            continue;
        };

        match normalize(href.as_str(), host) {
            Ok(url) => {
                links.insert(url);
            }
            Err(e) => {
                tracing::trace!("Dropping href {:?}: {}", href.as_str(), e);
            }
        }
    }

    links
}
