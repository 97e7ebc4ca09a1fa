pub mod client;
pub mod protocol;

pub use client::{ExecutionService, HttpExecutionClient};
pub use protocol::{interpret_response, ExecutionRequest, ExecutionResult, TableRef};
