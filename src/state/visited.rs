//! Visited store: the single piece of state shared by all workers
//!
//! A URL is "visited" the moment it is claimed. The claim inserts a zero-valued
//! placeholder under the lock, so exactly one caller wins the right to fetch it.
//! Keys are never removed during a run.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Word and number counts for one page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageResult {
    /// Canonical URL of the page
    pub url: String,

    /// Tokens that are not numbers
    pub word_count: usize,

    /// Tokens that parse as floating-point numerals
    pub number_count: usize,
}

impl PageResult {
    /// Zero-valued result marking a claimed URL
    pub fn placeholder(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            word_count: 0,
            number_count: 0,
        }
    }
}

/// Concurrency-safe map from canonical URL to its analysis result
#[derive(Debug, Default)]
pub struct VisitedStore {
    pages: Mutex<HashMap<String, PageResult>>,
}

impl VisitedStore {
    pub fn new() -> Self {
        Self::default()
    }

    // The map stays consistent even if a holder panicked, so poisoning is ignored.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, PageResult>> {
        self.pages.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Atomically claims `url`
    ///
    /// Returns true iff this call inserted the placeholder, i.e. the caller now
    /// owns fetching the URL.
    pub fn try_claim(&self, url: &str) -> bool {
        let mut pages = self.lock();
        if pages.contains_key(url) {
            return false;
        }
        pages.insert(url.to_string(), PageResult::placeholder(url));
        true
    }

    /// Overwrites the result of an already-claimed URL
    ///
    /// Returns false (and stores nothing) if the URL was never claimed.
    pub fn record(&self, result: PageResult) -> bool {
        let mut pages = self.lock();
        match pages.get_mut(&result.url) {
            Some(slot) => {
                *slot = result;
                true
            }
            None => false,
        }
    }

    /// Returns true if `url` has been claimed
    pub fn contains(&self, url: &str) -> bool {
        self.lock().contains_key(url)
    }

    /// Returns the stored result for `url`
    pub fn get(&self, url: &str) -> Option<PageResult> {
        self.lock().get(url).cloned()
    }

    /// Number of claimed URLs
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Copies the current contents, ordered by URL
    ///
    /// Only meaningful once the crawl has finished.
    pub fn snapshot(&self) -> BTreeMap<String, PageResult> {
        self.lock()
            .iter()
            .map(|(url, result)| (url.clone(), result.clone()))
            .collect()
    }
}
