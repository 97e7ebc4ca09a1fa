pub mod agent;
pub mod config;
pub mod error;
pub mod execution;
pub mod llm;
pub mod schema;
pub mod tracing;

#[cfg(test)]
pub(crate) mod testing;

pub use config::AssistantConfig;
pub use error::{AssistantError, Result};
