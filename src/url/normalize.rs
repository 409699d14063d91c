use crate::url::domain::extract_authority;
use crate::{UrlError, UrlResult};
use url::Url;

/// Scheme every canonical URL uses, whatever the link said
pub const CANONICAL_SCHEME: &str = "https";

/// Final labels that mark a file name rather than a top-level domain
///
/// Some of these are also real TLDs (`md`, `pl`, `zip`); a scheme-less link to
/// such a host is read as a relative path.
const DOCUMENT_EXTENSIONS: &[&str] = &[
    // pages
    "html", "htm", "xhtml", "shtml", "php", "asp", "aspx", "jsp", "cgi", "cfm", "pl", "xml",
    "txt", "pdf", "json", "md", "rss", "atom",
    // assets
    "css", "js", "mjs", "map", "wasm", "png", "jpg", "jpeg", "gif", "svg", "ico", "webp", "bmp",
    "woff", "woff2", "ttf", "otf", "mp3", "mp4", "webm", "wav",
    // downloads
    "csv", "tsv", "xls", "xlsx", "doc", "docx", "ppt", "pptx", "zip", "gz", "tar", "yaml", "yml",
];

/// Normalizes a raw `href` into a canonical URL on the crawl host
///
/// # Resolution Rules
///
/// 1. Empty and fragment-only hrefs are rejected
/// 2. `http://` and `https://` links must point at `host`
/// 3. `//authority/path` links are treated like rule 2
/// 4. `/path` links are resolved against the host root
/// 5. `host/path` (no scheme) is accepted when the first segment is `host`
/// 6. Any other scheme (`mailto:`, `javascript:`, ...) is rejected
/// 7. A first segment that looks like another host name is rejected; names
///    ending in a known file extension (`main.css`, `index.cfm`) are paths
/// 8. Everything else is a path relative to the host root
///
/// The canonical form is `https://host/path`: dot segments resolved, empty
/// segments and the trailing slash removed, query and fragment dropped. The
/// root page is `https://host` without a slash.
///
/// # Arguments
///
/// * `href` - The raw attribute value
/// * `host` - The crawl authority (lowercase host, optional port)
///
/// # Examples
///
/// ```
/// use wordcrawl::url::normalize;
///
/// assert_eq!(normalize("/a/../b?q=1", "example.com").unwrap(), "https://example.com/b");
/// assert_eq!(normalize("http://example.com/", "example.com").unwrap(), "https://example.com");
/// assert!(normalize("https://other.com/", "example.com").is_err());
/// ```
pub fn normalize(href: &str, host: &str) -> UrlResult<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return Err(UrlError::Empty);
    }

    if has_http_scheme(href) {
        return canonicalize(href, host);
    }

    if let Some(rest) = href.strip_prefix("//") {
        return canonicalize(&format!("{}://{}", CANONICAL_SCHEME, rest), host);
    }

    if href.starts_with('/') {
        return canonicalize(&format!("{}://{}{}", CANONICAL_SCHEME, host, href), host);
    }

    let segment = first_segment(href);
    if segment.eq_ignore_ascii_case(host) {
        return canonicalize(&format!("{}://{}", CANONICAL_SCHEME, href), host);
    }

    if let Some(scheme) = foreign_scheme(href) {
        return Err(UrlError::InvalidScheme(scheme.to_string()));
    }

    if looks_like_host(segment) {
        return Err(UrlError::CrossHost(segment.to_ascii_lowercase()));
    }

    canonicalize(&format!("{}://{}/{}", CANONICAL_SCHEME, host, href), host)
}

/// Parses an absolute URL, checks its authority and renders the canonical form
fn canonicalize(absolute: &str, host: &str) -> UrlResult<String> {
    let url = Url::parse(absolute).map_err(|e| UrlError::Parse(e.to_string()))?;

    let authority = extract_authority(&url).ok_or(UrlError::MissingHost)?;
    if !authority.eq_ignore_ascii_case(host) {
        return Err(UrlError::CrossHost(authority));
    }

    Ok(format!(
        "{}://{}{}",
        CANONICAL_SCHEME,
        authority,
        normalize_path(url.path())
    ))
}

/// Collapses a URL path: no dot segments, no empty segments, no trailing slash
///
/// The root path becomes the empty string.
fn normalize_path(path: &str) -> String {
    let mut normalized_segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => continue,
            ".." => {
                normalized_segments.pop();
            }
            _ => normalized_segments.push(segment),
        }
    }

    if normalized_segments.is_empty() {
        return String::new();
    }

    format!("/{}", normalized_segments.join("/"))
}

fn has_http_scheme(href: &str) -> bool {
    let lower = href.get(..8).unwrap_or(href).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Returns everything before the first `/`, `?` or `#`
fn first_segment(href: &str) -> &str {
    let end = href
        .find(|c: char| matches!(c, '/' | '?' | '#'))
        .unwrap_or(href.len());
    &href[..end]
}

/// Returns the scheme of a non-HTTP URI such as `mailto:` or `javascript:`
///
/// `name:1234` is an authority with a port, not a scheme.
fn foreign_scheme(href: &str) -> Option<&str> {
    let (scheme, rest) = first_segment(href).split_once(':')?;

    let mut chars = scheme.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    if !valid || is_port(rest) {
        return None;
    }

    Some(scheme)
}

/// Heuristic for `something.com` style first segments
fn looks_like_host(segment: &str) -> bool {
    if let Some((name, port)) = segment.rsplit_once(':') {
        return !name.is_empty() && is_port(port);
    }

    let labels: Vec<&str> = segment.split('.').collect();
    if labels.len() < 2
        || labels
            .iter()
            .any(|l| l.is_empty() || !l.chars().all(|c| c.is_ascii_alphanumeric() || c == '-'))
    {
        return false;
    }

    // dotted IPv4
    if labels.len() == 4 && labels.iter().all(|l| l.parse::<u8>().is_ok()) {
        return true;
    }

    let tld = labels[labels.len() - 1].to_ascii_lowercase();
    tld.len() >= 2
        && tld.chars().all(|c| c.is_ascii_alphabetic())
        && !DOCUMENT_EXTENSIONS.contains(&tld.as_str())
}

fn is_port(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
