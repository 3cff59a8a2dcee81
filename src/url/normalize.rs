use url::Url;

/// URI scheme prefixes that are rejected outright, before any URL parsing.
const BLOCKED_PREFIXES: &[&str] = &["mailto:", "javascript:", "data:"];

/// Path extensions (checked case-insensitively) that mark a link as a binary
/// resource rather than a crawlable page.
const BLOCKED_EXTENSIONS: &[&str] = &[
    ".jpg", ".jpeg", ".png", ".gif", ".svg", ".webp", ".pdf", ".zip", ".gz", ".tar", ".mp4",
    ".mp3",
];

/// Resolves `href` against `base` and returns its canonical form, or `None`
/// if the link should not be crawled.
///
/// Canonicalization: scheme restricted to `http`/`https`, host lowercased,
/// default port stripped (80 for http, 443 for https), fragment removed,
/// empty path replaced with `/`. The query string is preserved verbatim —
/// unlike superficially similar normalizers, this one does not force https,
/// strip a `www.` prefix, or reorder/drop query parameters; those would
/// change the identity of URLs the rest of the core treats as canonical.
///
/// # Examples
///
/// ```
/// use driftline::url::normalize;
///
/// assert_eq!(
///     normalize("https://example.com/", "/about").as_deref(),
///     Some("https://example.com/about")
/// );
/// assert_eq!(normalize("https://example.com/", "mailto:a@example.com"), None);
/// ```
pub fn normalize(base: &str, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    if BLOCKED_PREFIXES.iter().any(|p| href.starts_with(p)) {
        return None;
    }

    let base_url = Url::parse(base).ok()?;
    let mut resolved = base_url.join(href).ok()?;
    resolved.set_fragment(None);

    if resolved.scheme() != "http" && resolved.scheme() != "https" {
        return None;
    }

    let host = resolved.host_str()?.to_lowercase();
    resolved.set_host(Some(&host)).ok()?;
    strip_default_port(&mut resolved);

    if resolved.path().is_empty() {
        resolved.set_path("/");
    }

    let lower_path = resolved.path().to_lowercase();
    if BLOCKED_EXTENSIONS.iter().any(|ext| lower_path.ends_with(ext)) {
        return None;
    }

    Some(resolved.into())
}

fn strip_default_port(url: &mut Url) {
    let default_port = match url.scheme() {
        "http" => Some(80),
        "https" => Some(443),
        _ => None,
    };
    if url.port() == default_port {
        let _ = url.set_port(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_absolute() {
        assert_eq!(
            normalize("https://example.com/", "/about").as_deref(),
            Some("https://example.com/about")
        );
    }

    #[test]
    fn test_fragment_removed() {
        assert_eq!(
            normalize("https://example.com/x", "details#section").as_deref(),
            Some("https://example.com/details")
        );
    }

    #[test]
    fn test_blocked_schemes() {
        assert_eq!(normalize("https://example.com/", "mailto:test@example.com"), None);
        assert_eq!(normalize("https://example.com/", "javascript:void(0)"), None);
        assert_eq!(normalize("https://example.com/", "data:text/plain,hi"), None);
    }

    #[test]
    fn test_blocked_extensions_case_insensitive() {
        assert_eq!(normalize("https://example.com/", "image.JPG"), None);
        assert_eq!(normalize("https://example.com/", "doc.pdf"), None);
    }

    #[test]
    fn test_strip_default_ports() {
        assert_eq!(
            normalize("http://example.com/", "http://example.com:80/path").as_deref(),
            Some("http://example.com/path")
        );
        assert_eq!(
            normalize("https://example.com/", "https://example.com:443/path").as_deref(),
            Some("https://example.com/path")
        );
    }

    #[test]
    fn test_non_default_port_preserved() {
        assert_eq!(
            normalize("https://example.com/", "https://example.com:8443/path").as_deref(),
            Some("https://example.com:8443/path")
        );
    }

    #[test]
    fn test_host_lowercased_scheme_and_query_preserved() {
        assert_eq!(
            normalize("https://EXAMPLE.com/", "/Path?B=2&A=1").as_deref(),
            Some("https://example.com/Path?B=2&A=1")
        );
    }

    #[test]
    fn test_http_not_forced_to_https() {
        assert_eq!(
            normalize("http://example.com/", "/page").as_deref(),
            Some("http://example.com/page")
        );
    }

    #[test]
    fn test_www_not_stripped() {
        assert_eq!(
            normalize("https://www.example.com/", "/page").as_deref(),
            Some("https://www.example.com/page")
        );
    }

    #[test]
    fn test_empty_href_rejected() {
        assert_eq!(normalize("https://example.com/", "   "), None);
    }

    #[test]
    fn test_unresolvable_href_rejected() {
        assert_eq!(normalize("https://example.com/", "//[::badhost"), None);
    }

    #[test]
    fn test_idempotent() {
        let once = normalize("https://example.com/", "/a/b?x=1").unwrap();
        let twice = normalize(&once, &once).unwrap();
        assert_eq!(once, twice);
    }
}
