use crate::agent::guard::ensure_read_only;
use crate::agent::parser::strip_code_fences;
use crate::agent::prompt::{build_sql_task_prompt, sql_system_prompt};
use crate::error::Result;
use crate::execution::ExecutionService;
use crate::llm::{CompletionRequest, CompletionService, SQL_TEMPERATURE};
use crate::schema::describe_schema;

/// ask the model for one statement grounded in `schema_text`, then strip
/// fences and reject anything on the deny-list
#[tracing::instrument(skip(completion, prompt, schema_text), fields(prompt_len = prompt.len()))]
pub async fn generate_sql(
    completion: &dyn CompletionService,
    prompt: &str,
    schema_text: &str,
    dialect: &str,
) -> Result<String> {
    let request = CompletionRequest::new(
        sql_system_prompt(dialect),
        build_sql_task_prompt(schema_text, prompt),
        SQL_TEMPERATURE,
    );

    let output = completion.complete(request).await?;
    let sql = strip_code_fences(&output);
    ensure_read_only(&sql)?;

    tracing::info!(sql_length = sql.len(), "sql generated");
    Ok(sql)
}

/// introspect the live schema and synthesize sql for `prompt`.
/// the credential is checked before the execution service is touched.
#[tracing::instrument(skip(completion, execution, prompt))]
pub async fn synthesize(
    completion: &dyn CompletionService,
    execution: &dyn ExecutionService,
    prompt: &str,
    dialect: &str,
) -> Result<String> {
    completion.ensure_ready()?;
    let schema = describe_schema(execution).await?;
    generate_sql(completion, prompt, &schema.to_string(), dialect).await
}
