use crate::config::AssistantConfig;
use crate::error::{AssistantError, Result};
use crate::llm::model::{CompletionRequest, CompletionService, Message};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// chat-completions client for openai-compatible endpoints
pub struct OpenAiClient {
    api_key: Option<String>,
    base_url: String,
    model: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    temperature: f32,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

impl OpenAiClient {
    pub fn new(
        api_key: Option<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AssistantError::Config(format!("failed to build http client: {}", e)))?;
        Ok(Self {
            api_key: api_key.filter(|k| !k.is_empty()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            client,
        })
    }

    pub fn from_config(config: &AssistantConfig) -> Result<Self> {
        Self::new(
            config.openai_api_key.clone(),
            config.openai_base_url.clone(),
            config.model.clone(),
            config.request_timeout,
        )
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| AssistantError::Config("OPENAI_API_KEY not configured".to_string()))
    }
}

#[async_trait]
impl CompletionService for OpenAiClient {
    fn ensure_ready(&self) -> Result<()> {
        self.api_key().map(|_| ())
    }

    #[tracing::instrument(skip(self, request), fields(model = %self.model, temperature = request.temperature))]
    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        let api_key = self.api_key()?;

        let body = ChatRequest {
            model: &self.model,
            messages: &request.messages,
            temperature: request.temperature,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AssistantError::Generation(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let truncated: String = body.chars().take(200).collect();
            return Err(AssistantError::Generation(format!(
                "http {}: {}",
                status, truncated
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| AssistantError::Generation(format!("unreadable response: {}", e)))?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AssistantError::Generation("no choices returned".to_string()))?
            .message
            .content
            .ok_or_else(|| AssistantError::Generation("first choice has no content".to_string()))?;

        tracing::debug!(chars = text.len(), "completion received");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::model::SQL_TEMPERATURE;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/v1", addr)
    }

    fn client(key: Option<&str>, base_url: String) -> OpenAiClient {
        OpenAiClient::new(
            key.map(str::to_string),
            base_url,
            "gpt-4o-mini",
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_missing_key_is_config_error() {
        let client = client(None, "http://127.0.0.1:9/v1".to_string());
        assert!(matches!(client.ensure_ready(), Err(AssistantError::Config(_))));

        let err = client
            .complete(CompletionRequest::new("s", "u", SQL_TEMPERATURE))
            .await
            .unwrap_err();
        assert!(matches!(err, AssistantError::Config(_)));
    }

    #[tokio::test]
    async fn test_first_choice_is_returned() {
        let router = Router::new().route(
            "/v1/chat/completions",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                assert_eq!(headers["authorization"], "Bearer sk-test");
                assert_eq!(body["model"], "gpt-4o-mini");
                assert_eq!(body["messages"][0]["role"], "system");
                Json(json!({
                    "choices": [
                        {"message": {"content": "SELECT 1"}},
                        {"message": {"content": "SELECT 2"}}
                    ]
                }))
            }),
        );
        let client = client(Some("sk-test"), serve(router).await);

        let text = client
            .complete(CompletionRequest::new("s", "u", SQL_TEMPERATURE))
            .await
            .unwrap();
        assert_eq!(text, "SELECT 1");
    }

    #[tokio::test]
    async fn test_http_failure_is_generation_error() {
        let router = Router::new().route(
            "/v1/chat/completions",
            post(|| async { (StatusCode::TOO_MANY_REQUESTS, "rate limited") }),
        );
        let client = client(Some("sk-test"), serve(router).await);

        let err = client
            .complete(CompletionRequest::new("s", "u", SQL_TEMPERATURE))
            .await
            .unwrap_err();
        assert!(matches!(err, AssistantError::Generation(ref m) if m.contains("rate limited")));
    }

    #[tokio::test]
    async fn test_empty_choices_is_generation_error() {
        let router = Router::new().route(
            "/v1/chat/completions",
            post(|| async { Json(json!({"choices": []})) }),
        );
        let client = client(Some("sk-test"), serve(router).await);

        let err = client
            .complete(CompletionRequest::new("s", "u", SQL_TEMPERATURE))
            .await
            .unwrap_err();
        assert!(matches!(err, AssistantError::Generation(_)));
    }
}
