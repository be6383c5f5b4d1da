use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use configs::AiConfig;

use super::{Prompt, TextGenerator};
use crate::errors::ServiceError;

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Non-streaming client for the Anthropic Messages API.
pub struct AnthropicClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl AnthropicClient {
    pub fn new(cfg: &AiConfig) -> Result<Self, ServiceError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs.max(1)))
            .build()
            .map_err(|e| ServiceError::Upstream(e.to_string()))?;
        Ok(Self {
            http,
            api_key: cfg.api_key.clone(),
            model: cfg.model.clone(),
            endpoint: format!("{}/v1/messages", cfg.base_url.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl TextGenerator for AnthropicClient {
    async fn generate(&self, prompt: &Prompt) -> Result<String, ServiceError> {
        if self.api_key.is_empty() {
            return Err(ServiceError::Upstream("LLM API key not configured".into()));
        }
        let body = serde_json::json!({
            "model": self.model,
            "max_tokens": prompt.max_tokens,
            "system": prompt.system,
            "messages": [{ "role": "user", "content": prompt.user }]
        });

        let resp = self
            .http
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| ServiceError::Upstream(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            warn!(%status, "llm request rejected");
            return Err(ServiceError::Upstream(format!("LLM returned {status}: {text}")));
        }

        let parsed: MessagesResponse =
            resp.json().await.map_err(|e| ServiceError::Upstream(e.to_string()))?;
        let text: String = parsed
            .content
            .into_iter()
            .filter(|b| b.kind == "text")
            .filter_map(|b| b.text)
            .collect::<Vec<_>>()
            .join("");
        if text.trim().is_empty() {
            return Err(ServiceError::Upstream("LLM returned no text".into()));
        }
        debug!(chars = text.len(), "llm response received");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::HeaderMap, routing::post, Json, Router};
    use serde_json::{json, Value};

    async fn spawn_mock(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn config(base_url: String, api_key: &str) -> AiConfig {
        AiConfig { api_key: api_key.into(), base_url, ..AiConfig::default() }
    }

    fn prompt() -> Prompt {
        Prompt { system: "be brief".into(), user: "hello".into(), max_tokens: 64 }
    }

    #[tokio::test]
    async fn sends_messages_request_and_joins_text_blocks() {
        let router = Router::new().route(
            "/v1/messages",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                assert_eq!(headers["x-api-key"], "test-key");
                assert_eq!(headers["anthropic-version"], ANTHROPIC_VERSION);
                assert_eq!(body["messages"][0]["content"], "hello");
                assert_eq!(body["system"], "be brief");
                Json(json!({
                    "content": [
                        { "type": "text", "text": "Hi " },
                        { "type": "text", "text": "there" }
                    ]
                }))
            }),
        );
        let base = spawn_mock(router).await;
        let client = AnthropicClient::new(&config(base, "test-key")).unwrap();
        assert_eq!(client.generate(&prompt()).await.unwrap(), "Hi there");
    }

    #[tokio::test]
    async fn non_success_status_is_upstream_error() {
        let router = Router::new().route(
            "/v1/messages",
            post(|| async { (axum::http::StatusCode::TOO_MANY_REQUESTS, "slow down") }),
        );
        let base = spawn_mock(router).await;
        let client = AnthropicClient::new(&config(base, "test-key")).unwrap();
        let err = client.generate(&prompt()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Upstream(ref m) if m.contains("429")));
    }

    #[tokio::test]
    async fn missing_key_fails_without_request() {
        let client = AnthropicClient::new(&config("http://127.0.0.1:9".into(), "")).unwrap();
        assert!(matches!(client.generate(&prompt()).await, Err(ServiceError::Upstream(_))));
    }
}
