pub const ANSWER_SYSTEM_PROMPT: &str =
    "You are a helpful assistant. Answer the user's question clearly and concisely.";

pub fn sql_system_prompt(dialect: &str) -> String {
    format!(
        "You are an expert SQL generator. \
         Return only a single valid SQL query (no prose). \
         Target dialect: {}. Use existing tables and columns only. \
         Use explicit JOINs and prefer join keys indicated by foreign keys. \
         Qualify columns with table aliases (e.g., c.id) and avoid referencing non-existent columns.",
        dialect
    )
}

pub fn build_sql_task_prompt(schema_text: &str, prompt: &str) -> String {
    format!(
        "Database schema:\n{}\n\nUser request: {}\nSQL:",
        schema_text, prompt
    )
}
