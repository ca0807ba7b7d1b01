//! OpenAI-compatible chat-completion client (Groq by default).

use std::time::Instant;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::http_client::build_api_http_client;
use super::{ApiError, CompletionApi, CompletionRequest};

/// Default completion API base URL.
const DEFAULT_BASE_URL: &str = "https://api.groq.com";

/// Model used when none is configured.
pub const DEFAULT_COMPLETION_MODEL: &str = "llama-3.3-70b-versatile";

const SERVICE: &str = "completion";

// ==================== Wire Types ====================

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

// ==================== ChatCompletionClient ====================

/// Sends single-turn prompts to `POST {base}/openai/v1/chat/completions`.
pub struct ChatCompletionClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl ChatCompletionClient {
    /// Creates a client against the public Groq endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if HTTP client construction fails.
    #[tracing::instrument(skip(api_key, model))]
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self, ApiError> {
        Self::with_base_url(api_key, model, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (config override or wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if HTTP client construction fails.
    #[tracing::instrument(skip_all)]
    pub fn with_base_url(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, ApiError> {
        let client = build_api_http_client(SERVICE)?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }
}

impl std::fmt::Debug for ChatCompletionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatCompletionClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl CompletionApi for ChatCompletionClient {
    #[tracing::instrument(skip(self, request), fields(service = SERVICE, model = %self.model))]
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ApiError> {
        let url = format!("{}/openai/v1/chat/completions", self.base_url);

        let mut messages = Vec::with_capacity(2);
        if let Some(system) = request.system.as_deref() {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: &request.user,
        });
        let body = ChatRequest {
            model: &self.model,
            messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        debug!(prompt_len = request.user.len(), "Calling completion API");
        let start = Instant::now();

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Completion API request failed");
                ApiError::transport(SERVICE, &e)
            })?;

        let status = response.status();
        if !status.is_success() {
            debug!(status = status.as_u16(), "Completion API error");
            return Err(ApiError::http_status(SERVICE, status.as_u16()));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| ApiError::invalid_response(SERVICE, &e.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .ok_or_else(|| ApiError::invalid_response(SERVICE, "no content in first choice"))?;

        debug!(
            elapsed_ms = start.elapsed().as_millis(),
            content_len = content.len(),
            "Completion API returned"
        );
        Ok(content.trim().to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_support::socket_guard::start_mock_server_or_skip;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, ResponseTemplate};

    fn completion_json(content: &str) -> serde_json::Value {
        serde_json::json!({
            "id": "chatcmpl-1",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": content}}]
        })
    }

    #[tokio::test]
    async fn test_complete_sends_model_messages_and_bearer() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };

        Mock::given(method("POST"))
            .and(path("/openai/v1/chat/completions"))
            .and(header("Authorization", "Bearer groq-key"))
            .and(body_partial_json(serde_json::json!({
                "model": "llama-3.3-70b-versatile",
                "max_tokens": 500,
                "messages": [
                    {"role": "system", "content": "Return JSON."},
                    {"role": "user", "content": "Describe Cursor"}
                ]
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(completion_json("  {\"ok\":true}\n")),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = ChatCompletionClient::with_base_url(
            "groq-key",
            DEFAULT_COMPLETION_MODEL,
            mock_server.uri(),
        )
        .unwrap();
        let request =
            CompletionRequest::new("Describe Cursor", 0.3, 500).with_system("Return JSON.");
        let content = client.complete(&request).await.unwrap();
        assert_eq!(content, "{\"ok\":true}");
    }

    #[tokio::test]
    async fn test_complete_without_system_sends_only_user_message() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };

        Mock::given(method("POST"))
            .and(path("/openai/v1/chat/completions"))
            .and(body_partial_json(serde_json::json!({
                "messages": [{"role": "user", "content": "hi"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_json("hello")))
            .mount(&mock_server)
            .await;

        let client =
            ChatCompletionClient::with_base_url("k", "test-model", mock_server.uri()).unwrap();
        let content = client
            .complete(&CompletionRequest::new("hi", 0.3, 100))
            .await
            .unwrap();
        assert_eq!(content, "hello");
    }

    #[tokio::test]
    async fn test_complete_empty_choices_is_invalid_response() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };

        Mock::given(method("POST"))
            .and(path("/openai/v1/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})),
            )
            .mount(&mock_server)
            .await;

        let client = ChatCompletionClient::with_base_url("k", "m", mock_server.uri()).unwrap();
        let err = client
            .complete(&CompletionRequest::new("hi", 0.3, 100))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse { .. }));
    }

    #[tokio::test]
    async fn test_complete_unauthorized_maps_to_http_status() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };

        Mock::given(method("POST"))
            .and(path("/openai/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&mock_server)
            .await;

        let client = ChatCompletionClient::with_base_url("bad", "m", mock_server.uri()).unwrap();
        let err = client
            .complete(&CompletionRequest::new("hi", 0.3, 100))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(401));
    }
}
