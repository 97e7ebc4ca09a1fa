/// sql vocabulary plus the demo domain's nouns and aggregate words
pub const DATABASE_KEYWORDS: &[&str] = &[
    "sql", "select", "from", "where", "join", "group by", "order by", "table", "tables",
    "column", "columns", "database", "schema", "customer", "customers", "order", "orders",
    "paid", "refunded", "count", "sum", "avg", "total", "limit",
];

/// lexical gate for routing a prompt to sql synthesis.
///
/// plain substring matching over the lowercased prompt. intentionally
/// permissive ("summary" matches "sum"), so borderline prompts go to sql
/// synthesis rather than the direct answer.
pub fn is_database_like(prompt: &str) -> bool {
    let lowered = prompt.to_lowercase();
    DATABASE_KEYWORDS.iter().any(|k| lowered.contains(k))
}
