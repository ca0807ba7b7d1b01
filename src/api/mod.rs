//! Third-party API clients.
//!
//! The pipeline talks to three external services: a web search API, an
//! OpenAI-compatible chat-completion API and a logo image service. Each one
//! sits behind an async trait so the pipeline can be exercised with in-process
//! fakes, and each has an HTTP implementation that accepts a base URL override
//! for wiremock tests.

mod completion;
mod error;
mod http_client;
mod logo;
mod search;

pub use completion::{ChatCompletionClient, DEFAULT_COMPLETION_MODEL};
pub use error::ApiError;
pub use http_client::{
    DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_READ_TIMEOUT_SECS, build_api_http_client,
    configure_http_timeouts,
};
pub use logo::HttpLogoProbe;
pub use search::BraveSearchClient;

use async_trait::async_trait;

/// A single web search hit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    /// Snippet text; empty when the service returned none.
    pub description: String,
    /// Thumbnail image URL, when present.
    pub thumbnail: Option<String>,
}

/// Results of one search call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
    /// Total number of matches reported by the service, if any.
    pub total_count: Option<u64>,
}

/// One single-turn chat-completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Optional system message sent before the user prompt.
    pub system: Option<String>,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl CompletionRequest {
    #[must_use]
    pub fn new(user: impl Into<String>, temperature: f32, max_tokens: u32) -> Self {
        Self {
            system: None,
            user: user.into(),
            temperature,
            max_tokens,
        }
    }

    #[must_use]
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }
}

/// Web search service.
#[async_trait]
pub trait SearchApi: Send + Sync {
    /// Runs `query`, asking for at most `count` results.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, non-success status or an
    /// unparseable body.
    async fn search(&self, query: &str, count: u8) -> Result<SearchResponse, ApiError>;
}

/// Chat-completion service.
#[async_trait]
pub trait CompletionApi: Send + Sync {
    /// Returns the text content of the first choice.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, non-success status or a body
    /// without a first choice.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ApiError>;
}

/// Existence check for a logo image URL.
#[async_trait]
pub trait LogoProbe: Send + Sync {
    /// Whether `url` answers a HEAD request with HTTP 200.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the request could not be sent at all.
    async fn exists(&self, url: &str) -> Result<bool, ApiError>;
}
