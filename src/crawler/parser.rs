//! Link and title extraction from fetched HTML.
//!
//! Canonicalization of individual links is delegated to
//! [`crate::url::normalize`]; this module's job is walking the parsed
//! document and turning `<a href>` tags into a deduped, ordered link list.

use crate::url::{normalize, strip_www};
use scraper::{Html, Selector};
use std::collections::HashSet;

/// Parses `html` (fetched from `base`) leniently and returns its title and
/// outbound links.
///
/// The title is the trimmed text of the first `<title>` element, or an empty
/// string if there is none. Links come from every `<a href>` normalized per
/// [`crate::url::normalize`]; invalid links are dropped. If `allowed_domains`
/// is given, a link is kept only when its host, with a leading `www.`
/// stripped, is a member — the stripping applies to this filter only, not to
/// the link's own canonical form (see `SPEC_FULL.md` §9). Output preserves
/// first-seen document order with duplicates removed.
///
/// # Example
///
/// ```
/// use driftline::crawler::parser::extract;
///
/// let html = r#"<html><head><title>Home</title></head>
///     <body><a href="/a">A</a><a href="/a#frag">A again</a></body></html>"#;
/// let (title, links) = extract("https://example.com/", html, None);
/// assert_eq!(title, "Home");
/// assert_eq!(links, vec!["https://example.com/a".to_string()]);
/// ```
pub fn extract(base: &str, html: &str, allowed_domains: Option<&HashSet<String>>) -> (String, Vec<String>) {
    let document = Html::parse_document(html);
    let title = extract_title(&document);
    let links = extract_links(&document, base, allowed_domains);
    (title, links)
}

fn extract_title(document: &Html) -> String {
    let Ok(selector) = Selector::parse("title") else {
        return String::new();
    };
    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

fn extract_links(document: &Html, base: &str, allowed_domains: Option<&HashSet<String>>) -> Vec<String> {
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let Some(candidate) = normalize(base, href) else {
            continue;
        };
        if let Some(allowed) = allowed_domains {
            if !host_allowed(&candidate, allowed) {
                continue;
            }
        }
        if seen.insert(candidate.clone()) {
            out.push(candidate);
        }
    }

    out
}

fn host_allowed(url_str: &str, allowed_domains: &HashSet<String>) -> bool {
    match url::Url::parse(url_str) {
        Ok(url) => match url.host_str() {
            Some(host) => allowed_domains.contains(strip_www(&host.to_lowercase())),
            None => false,
        },
        Err(_) => false,
    }
}
