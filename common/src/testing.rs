//! in-memory doubles for the two remote services, recording every call

use crate::error::{AssistantError, Result};
use crate::execution::protocol::RUN_QUERY;
use crate::execution::ExecutionService;
use crate::llm::{CompletionRequest, CompletionService};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

enum QueryReply {
    Result(Value),
    RemoteError(String),
    Unreachable,
}

pub(crate) struct FakeExecution {
    unreachable: bool,
    tables: Value,
    query_results: HashMap<String, QueryReply>,
    calls: Mutex<Vec<(String, Value)>>,
}

impl FakeExecution {
    pub(crate) fn new() -> Self {
        Self {
            unreachable: false,
            tables: json!([]),
            query_results: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::new()
        }
    }

    pub(crate) fn with_tables(mut self, tables: Value) -> Self {
        self.tables = tables;
        self
    }

    pub(crate) fn with_query_result(mut self, sql: &str, result: Value) -> Self {
        self.query_results
            .insert(sql.to_string(), QueryReply::Result(result));
        self
    }

    pub(crate) fn with_query_error(mut self, sql: &str, message: &str) -> Self {
        self.query_results
            .insert(sql.to_string(), QueryReply::RemoteError(message.to_string()));
        self
    }

    /// the connection drops on this statement only; other calls still succeed
    pub(crate) fn with_unreachable_query(mut self, sql: &str) -> Self {
        self.query_results
            .insert(sql.to_string(), QueryReply::Unreachable);
        self
    }

    pub(crate) fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn method_count(&self, method: &str) -> usize {
        self.calls().iter().filter(|(m, _)| m == method).count()
    }

    /// sql of every run_query call, in order
    pub(crate) fn queries(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|(m, _)| m == RUN_QUERY)
            .filter_map(|(_, params)| params["sql"].as_str().map(str::to_string))
            .collect()
    }
}

#[async_trait]
impl ExecutionService for FakeExecution {
    async fn call(&self, method: &str, params: Value) -> Result<Value> {
        self.calls
            .lock()
            .unwrap()
            .push((method.to_string(), params.clone()));

        if self.unreachable {
            return Err(AssistantError::Transport("connection refused".to_string()));
        }

        match method {
            "list_tables" => Ok(self.tables.clone()),
            "run_query" => {
                let sql = params["sql"].as_str().unwrap_or_default();
                match self.query_results.get(sql) {
                    Some(QueryReply::Result(value)) => Ok(value.clone()),
                    Some(QueryReply::RemoteError(message)) => {
                        Err(AssistantError::RemoteExecution(message.clone()))
                    }
                    Some(QueryReply::Unreachable) => {
                        Err(AssistantError::Transport("connection reset".to_string()))
                    }
                    None => Err(AssistantError::Protocol(format!("unexpected query: {}", sql))),
                }
            }
            other => Err(AssistantError::RemoteExecution(format!(
                "unknown method {}",
                other
            ))),
        }
    }
}

pub(crate) struct FakeCompletion {
    configured: bool,
    replies: Mutex<VecDeque<std::result::Result<String, String>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl FakeCompletion {
    /// replies are handed out in order, one per `complete` call
    pub(crate) fn replying(replies: &[&str]) -> Self {
        Self {
            configured: true,
            replies: Mutex::new(replies.iter().map(|r| Ok(r.to_string())).collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn failing(message: &str) -> Self {
        Self {
            configured: true,
            replies: Mutex::new(VecDeque::from(vec![Err(message.to_string())])),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::replying(&[])
        }
    }

    pub(crate) fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionService for FakeCompletion {
    fn ensure_ready(&self) -> Result<()> {
        if self.configured {
            Ok(())
        } else {
            Err(AssistantError::Config("OPENAI_API_KEY not configured".to_string()))
        }
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        self.ensure_ready()?;
        self.requests.lock().unwrap().push(request);
        match self.replies.lock().unwrap().pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(AssistantError::Generation(message)),
            None => Err(AssistantError::Generation("no scripted reply".to_string())),
        }
    }
}
