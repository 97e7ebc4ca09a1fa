pub mod model;
pub mod openai;

pub use model::{
    CompletionRequest, CompletionService, Message, MessageRole, ANSWER_TEMPERATURE,
    SQL_TEMPERATURE,
};
pub use openai::OpenAiClient;
