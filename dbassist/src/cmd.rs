use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use common::agent::{Assistant, AssistantResponse};
use common::config::{
    execution_url, AssistantConfig, DEFAULT_EXECUTION_HOST, DEFAULT_EXECUTION_PORT,
};
use common::execution::{ExecutionResult, ExecutionService, HttpExecutionClient};
use common::llm::OpenAiClient;
use common::schema::describe_schema;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "dbassist")]
#[command(about = "ask questions of a database in natural language", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    settings: Settings,

    #[command(subcommand)]
    command: Commands,
}

/// command-line overrides, applied on top of the environment
#[derive(Args)]
struct Settings {
    /// Execution service URL (overrides host and port)
    #[arg(long, global = true)]
    mcp_url: Option<String>,

    /// Execution service host
    #[arg(long, global = true)]
    mcp_host: Option<String>,

    /// Execution service port
    #[arg(long, global = true)]
    mcp_port: Option<u16>,

    /// Completion model name
    #[arg(long, global = true)]
    model: Option<String>,

    /// SQL dialect the model should target
    #[arg(long, global = true)]
    dialect: Option<String>,

    /// Timeout for each remote call, in seconds
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,
}

impl Settings {
    fn apply(self, mut config: AssistantConfig) -> AssistantConfig {
        if let Some(url) = self.mcp_url {
            config.execution_url = url;
        } else if self.mcp_host.is_some() || self.mcp_port.is_some() {
            let host = self
                .mcp_host
                .unwrap_or_else(|| DEFAULT_EXECUTION_HOST.to_string());
            let port = self.mcp_port.unwrap_or(DEFAULT_EXECUTION_PORT);
            config.execution_url = execution_url(&host, port);
        }
        if let Some(model) = self.model {
            config.model = model;
        }
        if let Some(dialect) = self.dialect {
            config.dialect = dialect;
        }
        if let Some(secs) = self.timeout_secs {
            config.request_timeout = Duration::from_secs(secs);
        }
        config
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Answer a prompt, running generated SQL when the prompt is about the database
    Ask {
        /// The question to ask
        prompt: String,

        /// Print the raw response as JSON
        #[arg(long, default_value = "false")]
        json: bool,
    },
    /// List tables known to the execution service
    Tables,
    /// Print the schema description used to ground SQL generation
    Schema,
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let config = self.settings.apply(AssistantConfig::from_env()?);
        tracing::debug!(
            execution_url = %config.execution_url,
            model = %config.model,
            dialect = %config.dialect,
            "configuration loaded"
        );

        let execution = Arc::new(HttpExecutionClient::from_config(&config)?);

        match self.command {
            Commands::Ask { prompt, json } => {
                let completion = Arc::new(OpenAiClient::from_config(&config)?);
                let assistant = Assistant::new(execution, completion, config.dialect.clone());
                let response = assistant.handle(&prompt).await;
                if json {
                    println!("{}", serde_json::to_string_pretty(&response)?);
                } else {
                    print!("{}", render_response(&response));
                }
            }
            Commands::Tables => {
                for table in execution.list_tables().await? {
                    println!("{}", table.qualified_name());
                }
            }
            Commands::Schema => {
                let schema = describe_schema(execution.as_ref()).await?;
                println!("{}", schema);
            }
        }

        Ok(())
    }
}

fn cell(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn render_response(response: &AssistantResponse) -> String {
    let mut out = String::new();

    if let Some(notice) = &response.error_notice {
        for line in notice.lines() {
            out.push_str(&format!("! {}\n", line));
        }
    }

    if !response.table_list.is_empty() {
        let names: Vec<String> = response
            .table_list
            .iter()
            .map(|t| t.qualified_name())
            .collect();
        out.push_str(&format!("tables: {}\n", names.join(", ")));
    }

    if let Some(sql) = &response.generated_sql {
        out.push_str(&format!("\n{}\n", sql));
    }

    match &response.execution_result {
        Some(ExecutionResult::Rows { columns, rows }) if !rows.is_empty() => {
            out.push('\n');
            out.push_str(&columns.join("\t"));
            out.push('\n');
            for row in rows {
                let cells: Vec<String> = columns
                    .iter()
                    .map(|c| row.get(c).map(cell).unwrap_or_default())
                    .collect();
                out.push_str(&cells.join("\t"));
                out.push('\n');
            }
        }
        Some(ExecutionResult::Rows { .. }) => out.push_str("\n(no rows)\n"),
        Some(ExecutionResult::RowCount { rowcount }) => {
            out.push_str(&format!("\naffected rows: {}\n", rowcount))
        }
        Some(ExecutionResult::Failed { error }) => out.push_str(&format!("! {}\n", error)),
        None => {}
    }

    if let Some(answer) = &response.direct_answer {
        out.push_str(&format!("\n{}\n", answer));
    }

    out
}
