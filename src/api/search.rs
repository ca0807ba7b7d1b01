//! Brave-compatible web search client.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use super::http_client::build_api_http_client;
use super::{ApiError, SearchApi, SearchResponse, SearchResult};

/// Default search API base URL.
const DEFAULT_BASE_URL: &str = "https://api.search.brave.com";

const SERVICE: &str = "search";

// ==================== Search API Response Types ====================

#[derive(Debug, Deserialize)]
struct BraveResponse {
    web: Option<BraveWeb>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BraveWeb {
    #[serde(default)]
    results: Vec<BraveResult>,
    total_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct BraveResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    description: Option<String>,
    thumbnail: Option<BraveThumbnail>,
}

#[derive(Debug, Deserialize)]
struct BraveThumbnail {
    src: Option<String>,
}

impl From<BraveResponse> for SearchResponse {
    fn from(response: BraveResponse) -> Self {
        let Some(web) = response.web else {
            return Self::default();
        };
        let results = web
            .results
            .into_iter()
            .map(|result| SearchResult {
                title: result.title,
                url: result.url,
                description: result.description.unwrap_or_default(),
                thumbnail: result
                    .thumbnail
                    .and_then(|thumb| thumb.src)
                    .filter(|src| !src.is_empty()),
            })
            .collect();
        Self {
            results,
            total_count: web.total_count,
        }
    }
}

// ==================== BraveSearchClient ====================

/// Calls `GET {base}/res/v1/web/search?q=..&count=..` with a subscription token.
pub struct BraveSearchClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl BraveSearchClient {
    /// Creates a client against the public Brave Search API.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if HTTP client construction fails.
    #[tracing::instrument(skip_all)]
    pub fn new(api_key: impl Into<String>) -> Result<Self, ApiError> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (config override or wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if HTTP client construction fails.
    #[tracing::instrument(skip(api_key, base_url))]
    pub fn with_base_url(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, ApiError> {
        let client = build_api_http_client(SERVICE)?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }
}

impl std::fmt::Debug for BraveSearchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BraveSearchClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl SearchApi for BraveSearchClient {
    #[tracing::instrument(skip(self), fields(service = SERVICE))]
    async fn search(&self, query: &str, count: u8) -> Result<SearchResponse, ApiError> {
        let url = format!(
            "{}/res/v1/web/search?q={}&count={}",
            self.base_url,
            urlencoding::encode(query),
            count
        );
        debug!(api_url = %url, "Calling search API");

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .header("X-Subscription-Token", &self.api_key)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Search API request failed");
                ApiError::transport(SERVICE, &e)
            })?;

        let status = response.status();
        if !status.is_success() {
            debug!(status = status.as_u16(), "Search API error");
            return Err(ApiError::http_status(SERVICE, status.as_u16()));
        }

        let body: BraveResponse = response
            .json()
            .await
            .map_err(|e| ApiError::invalid_response(SERVICE, &e.to_string()))?;
        let parsed = SearchResponse::from(body);
        debug!(
            results = parsed.results.len(),
            total_count = ?parsed.total_count,
            "Search API returned"
        );
        Ok(parsed)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_support::socket_guard::start_mock_server_or_skip;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, ResponseTemplate};

    #[test]
    fn test_missing_web_section_yields_no_results() {
        let body: BraveResponse = serde_json::from_str(r#"{"type":"search"}"#).unwrap();
        let parsed = SearchResponse::from(body);
        assert!(parsed.results.is_empty());
        assert!(parsed.total_count.is_none());
    }

    #[test]
    fn test_missing_description_and_thumbnail_default() {
        let body: BraveResponse = serde_json::from_value(serde_json::json!({
            "web": {"results": [{"title": "Tool", "url": "https://tool.ai"}]}
        }))
        .unwrap();
        let parsed = SearchResponse::from(body);
        assert_eq!(parsed.results[0].description, "");
        assert!(parsed.results[0].thumbnail.is_none());
    }

    #[tokio::test]
    async fn test_search_sends_token_and_parses_results() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };

        Mock::given(method("GET"))
            .and(path("/res/v1/web/search"))
            .and(query_param("q", "AI coding assistant"))
            .and(query_param("count", "20"))
            .and(header("X-Subscription-Token", "brave-key"))
            .and(header("Accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "web": {
                    "results": [{
                        "title": "Cursor - The AI Code Editor",
                        "url": "https://www.cursor.com/",
                        "description": "Built to make you extraordinarily productive.",
                        "thumbnail": {"src": "https://imgs.search.brave.com/cursor.png"}
                    }],
                    "totalCount": 1234
                }
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = BraveSearchClient::with_base_url("brave-key", mock_server.uri()).unwrap();
        let response = client.search("AI coding assistant", 20).await.unwrap();

        assert_eq!(response.total_count, Some(1234));
        assert_eq!(response.results.len(), 1);
        let first = &response.results[0];
        assert_eq!(first.title, "Cursor - The AI Code Editor");
        assert_eq!(first.url, "https://www.cursor.com/");
        assert_eq!(
            first.thumbnail.as_deref(),
            Some("https://imgs.search.brave.com/cursor.png")
        );
    }

    #[tokio::test]
    async fn test_search_rate_limited_maps_to_http_status() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };

        Mock::given(method("GET"))
            .and(path("/res/v1/web/search"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&mock_server)
            .await;

        let client = BraveSearchClient::with_base_url("brave-key", mock_server.uri()).unwrap();
        let err = client.search("anything", 5).await.unwrap_err();
        assert_eq!(err.status(), Some(429));
    }

    #[tokio::test]
    async fn test_search_invalid_body_is_invalid_response() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };

        Mock::given(method("GET"))
            .and(path("/res/v1/web/search"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&mock_server)
            .await;

        let client = BraveSearchClient::with_base_url("brave-key", mock_server.uri()).unwrap();
        let err = client.search("anything", 5).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse { .. }));
    }
}
