//! Search-result to candidate extraction and the heuristic content filter.
//!
//! The content filter runs on the raw search title and URL before any
//! completion call, and again on the classifier's cleaned name.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::api::SearchResult;
use crate::util::{compile_static_regex, host_matches_domain, host_of};

/// Domains that never host a tool's own landing page.
pub const BLOCKED_DOMAINS: &[&str] = &[
    "wikipedia.org",
    "youtube.com",
    "reddit.com",
    "linkedin.com",
    "twitter.com",
    "x.com",
    "facebook.com",
    "medium.com",
    "quora.com",
];

/// Title patterns that mark articles, listicles and comparisons.
static TITLE_PATTERNS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    [
        ("top-n", r"(?i)^\s*top\s+\d+"),
        ("best-n", r"(?i)^\s*best\s+\d+"),
        ("how-to", r"(?i)\bhow\s+to\b"),
        ("tutorial", r"(?i)\btutorials?\b"),
        ("guide", r"(?i)\bguides?\b"),
        ("versus", r"(?i)\b(?:vs\.?|versus)(?:\s|$)"),
        ("review", r"(?i)\breviews?\b"),
        ("alternatives", r"(?i)\balternatives?\b"),
        ("list-of", r"(?i)\blist\s+of\b"),
        ("ai-tools", r"(?i)\bai\s+tools\b"),
        ("best-ai", r"(?i)\bbest\s+ai\b"),
        ("top-ai", r"(?i)\btop\s+ai\b"),
        ("comparison", r"(?i)\bcomparisons?\b"),
    ]
    .into_iter()
    .map(|(label, pattern)| (label, compile_static_regex(pattern)))
    .collect()
});

/// URL path fragments that mark editorial pages.
const URL_PATH_PATTERNS: &[&str] = &[
    "/blog/",
    "/review",
    "/alternatives",
    "/news/",
    "/article",
    "/best-",
    "/top-",
    "/list",
    "/compare",
];

static NAME_STRIP_RE: LazyLock<Regex> = LazyLock::new(|| compile_static_regex(r"[^\w\s-]"));

/// A search hit that may be a tool's landing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Raw search result title.
    pub title: String,
    /// Title with punctuation stripped.
    pub name: String,
    pub url: String,
    pub description: String,
    /// Search thumbnail, used as a last-resort logo.
    pub thumbnail: Option<String>,
}

impl Candidate {
    /// Builds a candidate, deriving the display name from `title`.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        let title = title.into();
        Self {
            name: clean_candidate_name(&title),
            title,
            url: url.into(),
            description: description.into(),
            thumbnail: None,
        }
    }

    #[must_use]
    pub fn with_thumbnail(mut self, thumbnail: Option<String>) -> Self {
        self.thumbnail = thumbnail;
        self
    }
}

/// Removes every character that is not a word character, whitespace or `-`.
#[must_use]
pub fn clean_candidate_name(title: &str) -> String {
    NAME_STRIP_RE.replace_all(title, "").trim().to_string()
}

/// Whether `url` belongs to one of [`BLOCKED_DOMAINS`] or a subdomain of one.
#[must_use]
pub fn is_blocked_domain(url: &str) -> bool {
    host_of(url).is_some_and(|host| {
        BLOCKED_DOMAINS
            .iter()
            .any(|domain| host_matches_domain(&host, domain))
    })
}

/// Turns search hits into candidates, dropping blocked domains and empty URLs.
#[must_use]
pub fn extract_candidates(results: &[SearchResult]) -> Vec<Candidate> {
    results
        .iter()
        .filter(|result| !result.url.trim().is_empty() && !is_blocked_domain(&result.url))
        .map(|result| {
            Candidate::new(&result.title, &result.url, &result.description)
                .with_thumbnail(result.thumbnail.clone())
        })
        .collect()
}

/// Label of the first editorial-content pattern matched by `title` or `url`.
#[must_use]
pub fn bad_content_reason(title: &str, url: &str) -> Option<&'static str> {
    if let Some(label) = TITLE_PATTERNS
        .iter()
        .find(|(_, re)| re.is_match(title))
        .map(|(label, _)| *label)
    {
        return Some(label);
    }

    let path = Url::parse(url.trim())
        .map(|parsed| parsed.path().to_ascii_lowercase())
        .unwrap_or_else(|_| url.to_ascii_lowercase());
    URL_PATH_PATTERNS
        .iter()
        .find(|fragment| path.contains(*fragment))
        .copied()
}

/// Whether `title`/`url` look like an article, listicle or comparison page.
#[must_use]
pub fn is_bad_candidate(title: &str, url: &str) -> bool {
    bad_content_reason(title, url).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(title: &str, url: &str) -> SearchResult {
        SearchResult {
            title: title.to_string(),
            url: url.to_string(),
            description: String::new(),
            thumbnail: None,
        }
    }

    #[test]
    fn test_top_and_best_n_rejected_regardless_of_url() {
        for title in ["Top 10 AI Chatbots", "best 5 image tools", "  TOP 3 picks"] {
            assert!(is_bad_candidate(title, "https://realtool.ai/"), "{title}");
        }
        assert_eq!(
            bad_content_reason("Top 10 AI Chatbots", "https://blog.example.com/best-ai"),
            Some("top-n")
        );
    }

    #[test]
    fn test_title_patterns() {
        assert!(is_bad_candidate("How to write with AI", "https://a.ai"));
        assert!(is_bad_candidate("ChatGPT vs Claude", "https://a.ai"));
        assert!(is_bad_candidate("Jasper Alternatives", "https://a.ai"));
        assert!(is_bad_candidate("The best AI apps", "https://a.ai"));
        assert!(is_bad_candidate("Free AI Tools for Students", "https://a.ai"));
        assert!(!is_bad_candidate("Cursor - The AI Code Editor", "https://cursor.com/"));
        assert!(!is_bad_candidate("Topaz Labs", "https://topazlabs.com/"));
    }

    #[test]
    fn test_url_path_patterns() {
        assert_eq!(
            bad_content_reason("Acme", "https://acme.com/blog/launch"),
            Some("/blog/")
        );
        assert!(is_bad_candidate("Acme", "https://acme.com/compare/acme-vs-other"));
        assert!(is_bad_candidate("Acme", "https://acme.com/top-picks"));
        // host containing a pattern fragment is not a path match
        assert!(!is_bad_candidate("Listly", "https://listly.com/"));
    }

    #[test]
    fn test_blocked_domains_match_subdomains_only_on_label_boundary() {
        assert!(is_blocked_domain("https://en.wikipedia.org/wiki/ChatGPT"));
        assert!(is_blocked_domain("https://x.com/someone"));
        assert!(!is_blocked_domain("https://box.com/ai"));
        assert!(!is_blocked_domain("not a url"));
    }

    #[test]
    fn test_extract_candidates_filters_and_cleans_names() {
        let mut with_thumb = hit("Gamma: AI Presentations!", "https://gamma.app/");
        with_thumb.thumbnail = Some("https://imgs.example/gamma.png".to_string());
        let results = vec![
            hit("ChatGPT - Wikipedia", "https://en.wikipedia.org/wiki/ChatGPT"),
            hit("Some video", "https://www.youtube.com/watch?v=1"),
            hit("No URL", ""),
            with_thumb,
        ];

        let candidates = extract_candidates(&results);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].name, "Gamma AI Presentations");
        assert_eq!(candidates[0].title, "Gamma: AI Presentations!");
        assert_eq!(candidates[0].description, "");
        assert_eq!(
            candidates[0].thumbnail.as_deref(),
            Some("https://imgs.example/gamma.png")
        );
    }

    #[test]
    fn test_clean_candidate_name_keeps_hyphens_and_unicode_words() {
        assert_eq!(clean_candidate_name("  Krea.ai | Real-time  "), "Kreaai  Real-time");
        assert_eq!(clean_candidate_name("Café (beta)"), "Café beta");
    }
}
