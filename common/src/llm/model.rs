use crate::error::Result;
use async_trait::async_trait;
use serde::Serialize;

/// low temperature biases sql synthesis toward determinism
pub const SQL_TEMPERATURE: f32 = 0.1;
pub const ANSWER_TEMPERATURE: f32 = 0.3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
}

#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub messages: Vec<Message>,
    pub temperature: f32,
}

impl CompletionRequest {
    /// system instruction followed by one user turn
    pub fn new(system: impl Into<String>, user: impl Into<String>, temperature: f32) -> Self {
        Self {
            messages: vec![Message::system(system), Message::user(user)],
            temperature,
        }
    }
}

/// language-model completion capability
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// fails with `Config` when the service cannot be used at all
    fn ensure_ready(&self) -> Result<()> {
        Ok(())
    }

    /// text of the first generated candidate
    async fn complete(&self, request: CompletionRequest) -> Result<String>;
}
