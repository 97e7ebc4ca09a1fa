use crate::error::{AssistantError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const LIST_TABLES: &str = "list_tables";
pub const RUN_QUERY: &str = "run_query";

/// tagged command sent to the execution service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionRequest {
    pub method: String,
    pub params: Map<String, Value>,
}

impl ExecutionRequest {
    pub fn new(method: impl Into<String>, params: Value) -> Self {
        let params = match params {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            method: method.into(),
            params,
        }
    }
}

/// outcome of `run_query` as reported by the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExecutionResult {
    Rows {
        columns: Vec<String>,
        rows: Vec<Map<String, Value>>,
    },
    RowCount {
        rowcount: i64,
    },
    Failed {
        error: String,
    },
}

impl ExecutionResult {
    /// rows of a row-producing statement, empty otherwise
    pub fn rows(&self) -> &[Map<String, Value>] {
        match self {
            ExecutionResult::Rows { rows, .. } => rows,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRef {
    pub table_schema: String,
    pub table_name: String,
}

impl TableRef {
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.table_schema, self.table_name)
    }
}

fn status_error(status: u16) -> AssistantError {
    AssistantError::Transport(format!("execution service returned http {}", status))
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

/// message of an `{ error }` object; non-string errors are kept as json text
pub fn remote_error_message(value: &Value) -> Option<String> {
    match value.get("error")? {
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// unwrap a `{result}` / `{error}` envelope; the body is inspected before the
/// status so structured error detail survives non-2xx responses
pub fn interpret_response(status: u16, body: &str) -> Result<Value> {
    let parsed: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(e) => {
            if !is_success(status) {
                return Err(status_error(status));
            }
            return Err(AssistantError::Protocol(format!("body is not json: {}", e)));
        }
    };

    if let Some(result) = parsed.get("result") {
        return Ok(result.clone());
    }
    if let Some(message) = remote_error_message(&parsed) {
        return Err(AssistantError::RemoteExecution(message));
    }

    if !is_success(status) {
        return Err(status_error(status));
    }
    Err(AssistantError::Protocol(
        "response has neither result nor error".to_string(),
    ))
}
