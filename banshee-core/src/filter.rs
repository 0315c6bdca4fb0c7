//! Result link filtering and normalization
//!
//! The provider occasionally returns links outside the requested scope and
//! links pointing back at its own services. Everything that does not
//! mention the target, or lives on a provider host, is dropped before
//! results are accumulated.

use std::collections::{BTreeSet, HashSet};
use url::Url;

/// Marker identifying provider-owned hosts
pub const PROVIDER_MARKER: &str = "google";

/// Literal escapes rewritten after standard percent-decoding, in order
const LITERAL_ESCAPES: [(&str, &str); 9] = [
    ("%2520", " "),
    ("%20", " "),
    ("%3F", "?"),
    ("%3D", "="),
    ("%21", "!"),
    ("%23", "#"),
    ("%24", "$"),
    ("%2B", "+"),
    ("%26", "&"),
];

/// Filters, decodes and deduplicates raw result links
///
/// Output keeps first-seen order and contains only links that mention
/// `target` (case-insensitive) and are not served from a provider host.
///
/// # Examples
///
/// ```
/// use banshee_core::filter::filter_links;
///
/// let raw = vec![
///     "http://example.com/a.pdf".to_string(),
///     "http://google.com/x".to_string(),
///     "http://example.com/a.pdf".to_string(),
/// ];
/// assert_eq!(filter_links(&raw, "example.com"), vec!["http://example.com/a.pdf"]);
/// ```
pub fn filter_links<S: AsRef<str>>(raw: &[S], target: &str) -> Vec<String> {
    let target = target.to_lowercase();
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(raw.len());

    for link in raw {
        let link = link.as_ref().trim();
        if link.is_empty() {
            continue;
        }
        if !link.to_lowercase().contains(&target) {
            continue;
        }
        if is_provider_link(link) {
            continue;
        }

        let decoded = decode_link(link);
        if !decoded.is_empty() && seen.insert(decoded.clone()) {
            out.push(decoded);
        }
    }

    out
}

/// True when the link's host belongs to the search provider
pub fn is_provider_link(link: &str) -> bool {
    let haystack = host_of(link).unwrap_or_else(|| link.to_string());
    haystack.to_lowercase().contains(PROVIDER_MARKER)
}

/// Percent-decodes a link and rewrites the literal escape table
pub fn decode_link(link: &str) -> String {
    let mut decoded = match urlencoding::decode(link) {
        Ok(s) => s.into_owned(),
        Err(_) => link.to_string(),
    };
    for (from, to) in LITERAL_ESCAPES {
        decoded = decoded.replace(from, to);
    }
    decoded
}

/// Extracts `host[:port]` from a link
///
/// Links without a scheme are retried with `http://` prepended.
///
/// # Examples
///
/// ```
/// use banshee_core::filter::host_of;
///
/// assert_eq!(host_of("https://dev.example.com/login"), Some("dev.example.com".into()));
/// assert_eq!(host_of("dev.example.com:8080/x"), Some("dev.example.com:8080".into()));
/// ```
pub fn host_of(link: &str) -> Option<String> {
    let parsed = match Url::parse(link) {
        Ok(url) if url.host_str().is_some() => Some(url),
        _ if !link.starts_with("http://") && !link.starts_with("https://") => {
            Url::parse(&format!("http://{}", link)).ok()
        }
        _ => None,
    }?;

    let host = parsed.host_str()?;
    if host.is_empty() {
        return None;
    }
    Some(match parsed.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

/// Reduces a set of links to the set of their hosts
pub fn hosts_of<'a, I>(links: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a String>,
{
    links.into_iter().filter_map(|l| host_of(l)).collect()
}
