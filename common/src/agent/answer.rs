use crate::agent::prompt::ANSWER_SYSTEM_PROMPT;
use crate::error::Result;
use crate::llm::{CompletionRequest, CompletionService, ANSWER_TEMPERATURE};

/// free-form answer straight from the model
#[tracing::instrument(skip(completion, prompt), fields(prompt_len = prompt.len()))]
pub async fn answer(completion: &dyn CompletionService, prompt: &str) -> Result<String> {
    completion.ensure_ready()?;
    let request = CompletionRequest::new(ANSWER_SYSTEM_PROMPT, prompt, ANSWER_TEMPERATURE);
    let text = completion.complete(request).await?;
    Ok(text.trim().to_string())
}
