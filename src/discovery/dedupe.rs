//! Duplicate detection against the set of known tools.

use std::collections::HashSet;

use tracing::trace;

use crate::tool::Tool;
use crate::util::host_of;

/// Registrable domain of `url`: lowercased host with one leading `www.` removed.
///
/// Returns `None` when `url` does not parse or has no host.
#[must_use]
pub fn registrable_domain(url: &str) -> Option<String> {
    host_of(url)
}

/// Domains and lowercased names of every tool already in the directory or
/// accepted during the current run.
#[derive(Debug, Clone, Default)]
pub struct KnownTools {
    domains: HashSet<String>,
    names: HashSet<String>,
}

impl KnownTools {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the accumulator from the loaded directory.
    #[must_use]
    pub fn from_tools(tools: &[Tool]) -> Self {
        let mut known = Self::new();
        for tool in tools {
            known.insert(&tool.name, &tool.url);
        }
        known
    }

    /// Records a tool. Entries with unparseable URLs contribute only their name.
    pub fn insert(&mut self, name: &str, url: &str) {
        if let Some(domain) = registrable_domain(url) {
            self.domains.insert(domain);
        }
        self.names.insert(name.to_lowercase());
    }

    /// Whether a candidate shares a domain or case-insensitive name with a
    /// known tool. Unparseable URLs always count as duplicates.
    #[must_use]
    pub fn is_duplicate(&self, url: &str, name: &str) -> bool {
        let Some(domain) = registrable_domain(url) else {
            trace!(url, "Unparseable candidate URL treated as duplicate");
            return true;
        };
        self.domains.contains(&domain) || self.names.contains(&name.to_lowercase())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::{Category, Pricing};

    fn known() -> KnownTools {
        KnownTools::from_tools(&[
            Tool::new(
                "Cursor",
                Category::Code,
                "AI editor",
                Pricing::Freemium,
                "https://www.cursor.com/",
            ),
            Tool::new(
                "Gamma",
                Category::Design,
                "Slides",
                Pricing::Freemium,
                "https://gamma.app",
            ),
        ])
    }

    #[test]
    fn test_registrable_domain_normalizes_host() {
        assert_eq!(
            registrable_domain("https://WWW.Cursor.com/features").as_deref(),
            Some("cursor.com")
        );
        assert_eq!(
            registrable_domain("http://app.gamma.app/x").as_deref(),
            Some("app.gamma.app")
        );
        assert!(registrable_domain("cursor.com").is_none());
    }

    #[test]
    fn test_shared_domain_is_duplicate() {
        let known = known();
        assert!(known.is_duplicate("https://cursor.com/pricing", "Totally Different"));
        assert!(known.is_duplicate("http://www.gamma.app", "Other"));
    }

    #[test]
    fn test_case_insensitive_name_is_duplicate() {
        assert!(known().is_duplicate("https://new-site.io", "CURSOR"));
    }

    #[test]
    fn test_unparseable_url_is_duplicate() {
        assert!(known().is_duplicate("::not a url::", "Brand New"));
    }

    #[test]
    fn test_new_domain_and_name_is_not_duplicate() {
        let known = known();
        assert!(!known.is_duplicate("https://elevenlabs.io", "ElevenLabs"));
        // subdomains are distinct registrable domains under exact matching
        assert!(!known.is_duplicate("https://docs.cursor.com", "Cursor Docs"));
    }

    #[test]
    fn test_insert_extends_accumulator() {
        let mut known = known();
        assert_eq!(known.len(), 2);
        assert!(!known.is_duplicate("https://elevenlabs.io", "ElevenLabs"));
        known.insert("ElevenLabs", "https://elevenlabs.io/");
        assert!(known.is_duplicate("https://www.elevenlabs.io/voice", "Voice Thing"));
        assert!(known.is_duplicate("https://other.io", "elevenlabs"));
    }
}
