use crate::{UrlError, UrlResult};
use url::Url;

/// Extracts the authority (host plus non-default port) from a URL
///
/// The host is lowercased by the URL parser; the port is only kept when it is
/// not the default for the scheme, so `https://example.com:443/` and
/// `https://example.com/` share the authority `example.com`.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use wordcrawl::url::extract_authority;
///
/// let url = Url::parse("https://EXAMPLE.com/path").unwrap();
/// assert_eq!(extract_authority(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("http://127.0.0.1:8080/").unwrap();
/// assert_eq!(extract_authority(&url), Some("127.0.0.1:8080".to_string()));
/// ```
pub fn extract_authority(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    if host.is_empty() {
        return None;
    }
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

/// Prepends `https://` unless the input already names an HTTP(S) scheme
pub fn with_default_scheme(input: &str) -> String {
    let input = input.trim();
    let lower = input.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        input.to_string()
    } else {
        format!("https://{}", input)
    }
}

/// Parses a seed URL as typed by the user
///
/// Arguments without an `http://` or `https://` prefix get `https://`
/// prepended. The result must parse and carry a host.
pub fn parse_seed(input: &str) -> UrlResult<Url> {
    let candidate = with_default_scheme(input);

    let url = Url::parse(&candidate).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if extract_authority(&url).is_none() {
        return Err(UrlError::MissingHost);
    }

    Ok(url)
}
