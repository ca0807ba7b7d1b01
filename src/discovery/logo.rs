//! Logo lookup for newly accepted tools.
//!
//! Resolution order: a static table of known logos, then trusted domains whose
//! logo-service entry is used without probing, then a HEAD probe against the
//! logo service. A search thumbnail is the last resort.

use tracing::{debug, warn};

use crate::api::LogoProbe;
use crate::rate_limiter::{LOGO_SERVICE, RateLimiter};
use crate::util::host_matches_domain;

use super::registrable_domain;

/// Default logo service template.
pub const DEFAULT_LOGO_SERVICE_URL: &str = "https://logo.clearbit.com/{domain}";

/// Hand-picked logos for tools whose service entry is missing or poor.
const KNOWN_LOGOS: &[(&str, &str)] = &[
    ("chatgpt.com", "https://cdn.oaistatic.com/assets/apple-touch-icon-mz9nytnj.webp"),
    ("openai.com", "https://openai.com/favicon.ico"),
    ("claude.ai", "https://claude.ai/images/claude_app_icon.png"),
    (
        "gemini.google.com",
        "https://www.gstatic.com/lamda/images/gemini_favicon_f069958c85030456e93de685481c559f160ea06b.png",
    ),
    ("github.com", "https://github.githubassets.com/favicons/favicon.svg"),
    ("midjourney.com", "https://www.midjourney.com/apple-touch-icon.png"),
    ("perplexity.ai", "https://www.perplexity.ai/favicon.svg"),
    ("huggingface.co", "https://huggingface.co/front/assets/huggingface_logo-noborder.svg"),
];

/// Domains whose logo-service entry is known to exist.
const TRUSTED_LOGO_DOMAINS: &[&str] = &[
    "adobe.com",
    "anthropic.com",
    "canva.com",
    "cursor.com",
    "descript.com",
    "elevenlabs.io",
    "figma.com",
    "google.com",
    "grammarly.com",
    "jasper.ai",
    "microsoft.com",
    "notion.so",
    "otter.ai",
    "runwayml.com",
    "synthesia.io",
];

/// Resolves a logo URL for a tool.
#[derive(Debug, Clone)]
pub struct LogoResolver {
    service_template: String,
}

impl Default for LogoResolver {
    fn default() -> Self {
        Self::new(DEFAULT_LOGO_SERVICE_URL)
    }
}

impl LogoResolver {
    /// `service_template` must contain `{domain}`.
    #[must_use]
    pub fn new(service_template: impl Into<String>) -> Self {
        Self {
            service_template: service_template.into(),
        }
    }

    /// Logo-service URL for `domain`.
    #[must_use]
    pub fn service_url(&self, domain: &str) -> String {
        self.service_template.replace("{domain}", domain)
    }

    /// Static-table logo for `domain`, if any.
    #[must_use]
    pub fn known_logo(domain: &str) -> Option<&'static str> {
        KNOWN_LOGOS
            .iter()
            .find(|(known, _)| host_matches_domain(domain, known))
            .map(|(_, logo)| *logo)
    }

    #[must_use]
    pub fn is_trusted(domain: &str) -> bool {
        TRUSTED_LOGO_DOMAINS
            .iter()
            .any(|trusted| host_matches_domain(domain, trusted))
    }

    /// Returns the logo URL for `url`, or an empty string when none is found.
    ///
    /// Probe failures are logged and fall through to `thumbnail`.
    pub async fn resolve(
        &self,
        url: &str,
        thumbnail: Option<&str>,
        probe: &dyn LogoProbe,
        limiter: &RateLimiter,
    ) -> String {
        let fallback = || thumbnail.unwrap_or_default().to_string();
        let Some(domain) = registrable_domain(url) else {
            return fallback();
        };

        if let Some(logo) = Self::known_logo(&domain) {
            debug!(domain = %domain, "Logo from known table");
            return logo.to_string();
        }

        let service_url = self.service_url(&domain);
        if Self::is_trusted(&domain) {
            debug!(domain = %domain, "Logo from trusted domain list");
            return service_url;
        }

        limiter.acquire(LOGO_SERVICE).await;
        match probe.exists(&service_url).await {
            Ok(true) => {
                debug!(domain = %domain, "Logo service has an entry");
                service_url
            }
            Ok(false) => {
                debug!(domain = %domain, "Logo service has no entry");
                fallback()
            }
            Err(error) => {
                warn!(domain = %domain, error = %error, "Logo probe failed");
                fallback()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedProbe {
        answer: Option<bool>,
        calls: AtomicUsize,
    }

    impl FixedProbe {
        fn new(answer: Option<bool>) -> Self {
            Self {
                answer,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl LogoProbe for FixedProbe {
        async fn exists(&self, _url: &str) -> Result<bool, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.answer
                .ok_or_else(|| ApiError::invalid_response("logo", "connection reset"))
        }
    }

    #[tokio::test]
    async fn test_known_table_wins_without_probe() {
        let probe = FixedProbe::new(Some(true));
        let logo = LogoResolver::default()
            .resolve("https://www.perplexity.ai/", None, &probe, &RateLimiter::disabled())
            .await;
        assert_eq!(logo, "https://www.perplexity.ai/favicon.svg");
        assert_eq!(probe.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_trusted_domain_uses_service_without_probe() {
        let probe = FixedProbe::new(Some(false));
        let logo = LogoResolver::default()
            .resolve("https://www.notion.so/product/ai", None, &probe, &RateLimiter::disabled())
            .await;
        assert_eq!(logo, "https://logo.clearbit.com/notion.so");
        assert_eq!(probe.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_probe_hit_uses_service_url() {
        let probe = FixedProbe::new(Some(true));
        let resolver = LogoResolver::new("https://img.logo.dev/{domain}?size=64");
        let logo = resolver
            .resolve("https://krea.ai", None, &probe, &RateLimiter::disabled())
            .await;
        assert_eq!(logo, "https://img.logo.dev/krea.ai?size=64");
        assert_eq!(probe.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_probe_miss_or_error_falls_back_to_thumbnail() {
        let miss = FixedProbe::new(Some(false));
        let logo = LogoResolver::default()
            .resolve(
                "https://krea.ai",
                Some("https://thumbs.example/krea.png"),
                &miss,
                &RateLimiter::disabled(),
            )
            .await;
        assert_eq!(logo, "https://thumbs.example/krea.png");

        let failing = FixedProbe::new(None);
        let logo = LogoResolver::default()
            .resolve("https://krea.ai", None, &failing, &RateLimiter::disabled())
            .await;
        assert_eq!(logo, "");
    }
}
