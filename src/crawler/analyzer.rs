//! Page text analyzer
//!
//! This module reduces a raw HTML document to its visible body text and counts
//! the words and numbers in it. Everything is pattern matching over the raw
//! text; there is no DOM.
//!
//! # Pipeline
//!
//! 1. Isolate the first `<body ...>...</body>` region (XML documents count whole)
//! 2. Drop `<script>` and `<style>` regions
//! 3. Drop every remaining tag and all newlines, then trim
//! 4. Split on single spaces and classify each token as number or word

use crate::crawler::parser::extract_links;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

static BODY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<body(?:\s[^>]*)?>(.*?)</body>").unwrap());

static SCRIPT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<script(?:\s[^>]*)?>.*?</script>").unwrap());

static STYLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<style(?:\s[^>]*)?>.*?</style>").unwrap());

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^<>]*>").unwrap());

static NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?$").unwrap()
});

/// Word and number totals for a block of text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenCounts {
    pub words: usize,
    pub numbers: usize,
}

/// Everything the engine needs from one fetched document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessedPage {
    pub counts: TokenCounts,

    /// Canonical same-host URLs referenced by the body
    pub links: BTreeSet<String>,
}

/// Turns a fetched document into counts and links
///
/// The crawl engine only talks to this trait, so a real HTML parser can replace
/// the pattern-based default without touching the engine.
pub trait PageProcessor: Send + Sync {
    fn process(&self, raw_html: &str, host: &str) -> ProcessedPage;
}

/// Regex-based processor used by default
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternProcessor;

impl PageProcessor for PatternProcessor {
    fn process(&self, raw_html: &str, host: &str) -> ProcessedPage {
        let body = prepare_body(raw_html);
        ProcessedPage {
            counts: count_words_and_numbers(&visible_text(&body)),
            links: extract_links(&body, host),
        }
    }
}

/// Counts the words and numbers of a raw HTML document
pub fn analyze(raw_html: &str) -> TokenCounts {
    count_words_and_numbers(&visible_text(&prepare_body(raw_html)))
}

/// Returns the isolated body with script/style regions and newlines removed
///
/// Both link extraction and text analysis work on this fragment.
pub fn prepare_body(raw_html: &str) -> String {
    let body = isolate_body(raw_html);
    let body = SCRIPT_RE.replace_all(body, "");
    let body = STYLE_RE.replace_all(&body, "");
    body.replace(|c: char| c == '\n' || c == '\r', "")
}

/// Locates the content of the first `<body>` element
///
/// Documents without a body that start with an XML declaration (feeds) are
/// used whole. Anything else has an empty body.
pub fn isolate_body(raw_html: &str) -> &str {
    if let Some(captures) = BODY_RE.captures(raw_html) {
        if let Some(inner) = captures.get(1) {
            return inner.as_str();
        }
    }

    if raw_html.trim_start().starts_with("<?xml") {
        return raw_html;
    }

    ""
}

/// Removes all markup tags and trims the result
pub fn visible_text(fragment: &str) -> String {
    TAG_RE.replace_all(fragment, "").trim().to_string()
}

/// Splits on single spaces and classifies each token
///
/// Consecutive spaces yield empty tokens; they are not numbers, so each one
/// counts as a word.
pub fn count_words_and_numbers(text: &str) -> TokenCounts {
    if text.is_empty() {
        return TokenCounts::default();
    }

    let mut tokens = 0;
    let mut numbers = 0;
    for token in text.split(' ') {
        tokens += 1;
        if is_number(token) {
            numbers += 1;
        }
    }

    TokenCounts {
        words: tokens - numbers,
        numbers,
    }
}

/// Returns true if `token` is a decimal floating-point numeral
pub fn is_number(token: &str) -> bool {
    NUMBER_RE.is_match(token)
}
