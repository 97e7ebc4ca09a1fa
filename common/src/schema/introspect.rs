use crate::error::Result;
use crate::execution::ExecutionService;
use crate::schema::description::SchemaDescription;

pub const COLUMNS_QUERY: &str = "SELECT table_schema, table_name, column_name, data_type \
     FROM information_schema.columns \
     WHERE table_schema NOT IN ('pg_catalog','information_schema') \
     ORDER BY table_schema, table_name, ordinal_position";

pub const FOREIGN_KEYS_QUERY: &str = "SELECT tc.table_schema, tc.table_name, kcu.column_name, \
            ccu.table_schema AS foreign_table_schema, \
            ccu.table_name AS foreign_table_name, \
            ccu.column_name AS foreign_column_name \
     FROM information_schema.table_constraints AS tc \
     JOIN information_schema.key_column_usage AS kcu \
       ON tc.constraint_name = kcu.constraint_name AND tc.table_schema = kcu.table_schema \
     JOIN information_schema.constraint_column_usage AS ccu \
       ON ccu.constraint_name = tc.constraint_name AND ccu.table_schema = tc.table_schema \
     WHERE tc.constraint_type = 'FOREIGN KEY' \
     ORDER BY tc.table_schema, tc.table_name, kcu.column_name";

/// introspect live tables, columns and foreign keys through the execution service
#[tracing::instrument(skip(execution))]
pub async fn describe_schema(execution: &dyn ExecutionService) -> Result<SchemaDescription> {
    let columns = execution.run_query(COLUMNS_QUERY).await?;
    let foreign_keys = execution.run_query(FOREIGN_KEYS_QUERY).await?;

    let description = SchemaDescription::from_rows(columns.rows(), foreign_keys.rows())?;
    tracing::info!(tables = description.tables().len(), "schema introspected");
    Ok(description)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeExecution;
    use serde_json::json;

    #[tokio::test]
    async fn test_describe_schema_issues_two_queries() {
        let exec = FakeExecution::new()
            .with_query_result(
                COLUMNS_QUERY,
                json!({
                    "columns": ["table_schema", "table_name", "column_name", "data_type"],
                    "rows": [
                        {"table_schema": "public", "table_name": "orders", "column_name": "id", "data_type": "integer"}
                    ]
                }),
            )
            .with_query_result(FOREIGN_KEYS_QUERY, json!({"columns": [], "rows": []}));

        let description = describe_schema(&exec).await.unwrap();

        assert_eq!(exec.queries(), vec![COLUMNS_QUERY.to_string(), FOREIGN_KEYS_QUERY.to_string()]);
        assert_eq!(
            description.to_string(),
            "Tables and columns (with foreign keys):\n- public.orders (id:integer)"
        );
    }

    #[tokio::test]
    async fn test_describe_schema_propagates_transport_error() {
        let exec = FakeExecution::unreachable();
        let err = describe_schema(&exec).await.unwrap_err();
        assert!(err.is_transport());
    }
}
