//! Shared helpers: static regex compilation, host normalization, text truncation.

use regex::Regex;
use url::Url;

/// Compiles a regex at static init; panics on invalid pattern.
pub(crate) fn compile_static_regex(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid static regex '{pattern}': {e}"))
}

/// Normalizes a host string: trim, lowercase, strip one leading "www." and a trailing '.'.
#[must_use]
pub(crate) fn canonical_host(host: &str) -> String {
    let lowered = host.trim().to_ascii_lowercase();
    let stripped = lowered.strip_prefix("www.").unwrap_or(&lowered);
    stripped.trim_end_matches('.').to_string()
}

/// Parses `url` and returns its canonical host, if it has one.
#[must_use]
pub(crate) fn host_of(url: &str) -> Option<String> {
    Url::parse(url.trim())
        .ok()
        .and_then(|parsed| parsed.host_str().map(canonical_host))
        .filter(|host| !host.is_empty())
}

/// Whether `host` equals `domain` or is a subdomain of it.
#[must_use]
pub(crate) fn host_matches_domain(host: &str, domain: &str) -> bool {
    host == domain
        || host
            .strip_suffix(domain)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

/// Returns at most `max_chars` characters of `text`, never splitting a character.
#[must_use]
pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_host_strips_single_www_and_lowercases() {
        assert_eq!(canonical_host(" WWW.Cursor.COM. "), "cursor.com");
        assert_eq!(canonical_host("www.www.example.com"), "www.example.com");
        assert_eq!(canonical_host("app.example.com"), "app.example.com");
    }

    #[test]
    fn test_host_of_parses_urls() {
        assert_eq!(host_of("https://www.notion.so/product").as_deref(), Some("notion.so"));
        assert!(host_of("not a url").is_none());
        assert!(host_of("mailto:someone@example.com").is_none());
    }

    #[test]
    fn test_host_matches_domain_respects_label_boundaries() {
        assert!(host_matches_domain("x.com", "x.com"));
        assert!(host_matches_domain("en.wikipedia.org", "wikipedia.org"));
        assert!(!host_matches_domain("box.com", "x.com"));
        assert!(!host_matches_domain("notwikipedia.org", "wikipedia.org"));
    }

    #[test]
    fn test_truncate_chars_is_char_safe() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("", 3), "");
    }
}
