use crate::config::AssistantConfig;
use crate::error::{AssistantError, Result};
use crate::execution::protocol::{
    interpret_response, remote_error_message, ExecutionRequest, ExecutionResult, TableRef,
    LIST_TABLES, RUN_QUERY,
};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;

/// blocking request/response capability of the remote query-execution service
#[async_trait]
pub trait ExecutionService: Send + Sync {
    async fn call(&self, method: &str, params: Value) -> Result<Value>;

    async fn list_tables(&self) -> Result<Vec<TableRef>> {
        let value = self.call(LIST_TABLES, json!({})).await?;
        if let Some(message) = remote_error_message(&value) {
            return Err(AssistantError::RemoteExecution(message));
        }
        serde_json::from_value(value)
            .map_err(|e| AssistantError::Protocol(format!("unexpected list_tables result: {}", e)))
    }

    async fn run_query(&self, sql: &str) -> Result<ExecutionResult> {
        let value = self.call(RUN_QUERY, json!({ "sql": sql })).await?;
        let result: ExecutionResult = serde_json::from_value(value)
            .map_err(|e| AssistantError::Protocol(format!("unexpected run_query result: {}", e)))?;
        match result {
            ExecutionResult::Failed { error } => Err(AssistantError::RemoteExecution(error)),
            other => Ok(other),
        }
    }
}

/// json-over-http transport for the execution service
pub struct HttpExecutionClient {
    url: String,
    client: reqwest::Client,
}

impl HttpExecutionClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AssistantError::Config(format!("failed to build http client: {}", e)))?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }

    pub fn from_config(config: &AssistantConfig) -> Result<Self> {
        Self::new(config.execution_url.clone(), config.request_timeout)
    }
}

#[async_trait]
impl ExecutionService for HttpExecutionClient {
    #[tracing::instrument(skip(self, params), fields(url = %self.url))]
    async fn call(&self, method: &str, params: Value) -> Result<Value> {
        let request = ExecutionRequest::new(method, params);

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| AssistantError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| AssistantError::Transport(e.to_string()))?;

        tracing::debug!(status, body_len = body.len(), "execution service responded");

        interpret_response(status, &body)
    }
}
