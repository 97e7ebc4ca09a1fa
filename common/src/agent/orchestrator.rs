use crate::agent::answer::answer;
use crate::agent::classifier::is_database_like;
use crate::agent::synthesizer::synthesize;
use crate::error::{AssistantError, Result};
use crate::execution::{ExecutionResult, ExecutionService, TableRef};
use crate::llm::CompletionService;
use serde::Serialize;
use std::sync::Arc;

pub const EMPTY_PROMPT_NOTICE: &str = "Please enter a prompt.";
pub const UNREACHABLE_NOTICE: &str =
    "execution service is not reachable so answering from the language model";

/// everything the presentation layer receives for one request
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AssistantResponse {
    pub table_list: Vec<TableRef>,
    pub generated_sql: Option<String>,
    pub execution_result: Option<ExecutionResult>,
    pub direct_answer: Option<String>,
    pub error_notice: Option<String>,
}

/// terminal states of one request
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Rejected {
        notice: String,
    },
    Answered {
        answer: String,
        tables: Vec<TableRef>,
        notice: Option<String>,
    },
    Executed {
        sql: String,
        result: ExecutionResult,
        tables: Vec<TableRef>,
    },
    Failed {
        notice: String,
    },
}

impl From<Outcome> for AssistantResponse {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Rejected { notice } | Outcome::Failed { notice } => Self {
                error_notice: Some(notice),
                ..Self::default()
            },
            Outcome::Answered {
                answer,
                tables,
                notice,
            } => Self {
                table_list: tables,
                direct_answer: Some(answer),
                error_notice: notice,
                ..Self::default()
            },
            Outcome::Executed { sql, result, tables } => Self {
                table_list: tables,
                generated_sql: Some(sql),
                execution_result: Some(result),
                ..Self::default()
            },
        }
    }
}

enum Stage {
    Classify,
    /// `notice` is set when this is the fallback after an unreachable service
    DirectAnswer { notice: Option<String> },
    Synthesize,
    Respond(Outcome),
}

fn join_notices(first: Option<String>, second: String) -> String {
    match first {
        Some(first) => format!("{}\n{}", first, second),
        None => second,
    }
}

/// routes a prompt to sql synthesis + execution or to a direct answer
pub struct Assistant {
    execution: Arc<dyn ExecutionService>,
    completion: Arc<dyn CompletionService>,
    dialect: String,
}

impl Assistant {
    pub fn new(
        execution: Arc<dyn ExecutionService>,
        completion: Arc<dyn CompletionService>,
        dialect: impl Into<String>,
    ) -> Self {
        Self {
            execution,
            completion,
            dialect: dialect.into(),
        }
    }

    /// run one request to completion; failures end up in `error_notice`
    #[tracing::instrument(skip(self, prompt), fields(prompt_len = prompt.len()))]
    pub async fn handle(&self, prompt: &str) -> AssistantResponse {
        self.run(prompt).await.into()
    }

    pub async fn run(&self, prompt: &str) -> Outcome {
        let prompt = prompt.trim();
        let mut stage = Stage::Classify;

        loop {
            stage = match stage {
                Stage::Classify => {
                    if prompt.is_empty() {
                        let notice = AssistantError::Validation(EMPTY_PROMPT_NOTICE.to_string());
                        Stage::Respond(Outcome::Rejected {
                            notice: notice.to_string(),
                        })
                    } else if is_database_like(prompt) {
                        tracing::info!("routing prompt to sql synthesis");
                        Stage::Synthesize
                    } else {
                        tracing::info!("routing prompt to direct answer");
                        Stage::DirectAnswer { notice: None }
                    }
                }
                Stage::Synthesize => match self.synthesize_and_execute(prompt).await {
                    Ok(outcome) => Stage::Respond(outcome),
                    Err(e) if e.is_transport() => {
                        tracing::warn!("execution service unreachable, falling back: {}", e);
                        Stage::DirectAnswer {
                            notice: Some(UNREACHABLE_NOTICE.to_string()),
                        }
                    }
                    Err(e) => {
                        tracing::warn!("sql path failed: {}", e);
                        Stage::Respond(Outcome::Failed {
                            notice: e.to_string(),
                        })
                    }
                },
                Stage::DirectAnswer { notice } => {
                    match answer(self.completion.as_ref(), prompt).await {
                        Ok(text) => {
                            // the fallback path already knows the service is down
                            let tables = if notice.is_none() {
                                self.tables_for_display().await
                            } else {
                                Vec::new()
                            };
                            Stage::Respond(Outcome::Answered {
                                answer: text,
                                tables,
                                notice,
                            })
                        }
                        Err(e) => {
                            tracing::warn!("direct answer failed: {}", e);
                            Stage::Respond(Outcome::Failed {
                                notice: join_notices(notice, e.to_string()),
                            })
                        }
                    }
                }
                Stage::Respond(outcome) => return outcome,
            };
        }
    }

    async fn synthesize_and_execute(&self, prompt: &str) -> Result<Outcome> {
        let sql = synthesize(
            self.completion.as_ref(),
            self.execution.as_ref(),
            prompt,
            &self.dialect,
        )
        .await?;
        let result = self.execution.run_query(&sql).await?;
        let tables = self.execution.list_tables().await?;
        Ok(Outcome::Executed { sql, result, tables })
    }

    async fn tables_for_display(&self) -> Vec<TableRef> {
        match self.execution.list_tables().await {
            Ok(tables) => tables,
            Err(e) => {
                tracing::debug!("ignoring table list failure: {}", e);
                Vec::new()
            }
        }
    }
}
