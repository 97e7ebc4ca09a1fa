use crate::error::{AssistantError, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub name: String,
    pub data_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForeignKeyRef {
    pub source_column: String,
    pub target_schema: String,
    pub target_table: String,
    pub target_column: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableInfo {
    pub schema: String,
    pub name: String,
    /// ordinal order
    pub columns: Vec<Column>,
    pub foreign_keys: Vec<ForeignKeyRef>,
}

impl TableInfo {
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }
}

/// tables sorted by qualified name; built per request and never mutated
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SchemaDescription {
    tables: Vec<TableInfo>,
}

fn field<'a>(row: &'a Map<String, Value>, key: &str) -> Result<&'a str> {
    row.get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| AssistantError::Protocol(format!("introspection row missing {}", key)))
}

impl SchemaDescription {
    /// group column rows by table (keeping row order) and attach foreign keys
    /// to their source table; foreign keys of tables without columns are dropped
    pub fn from_rows(
        column_rows: &[Map<String, Value>],
        foreign_key_rows: &[Map<String, Value>],
    ) -> Result<Self> {
        let mut tables: BTreeMap<String, TableInfo> = BTreeMap::new();

        for row in column_rows {
            let schema = field(row, "table_schema")?;
            let name = field(row, "table_name")?;
            let column = Column {
                name: field(row, "column_name")?.to_string(),
                data_type: field(row, "data_type")?.to_string(),
            };

            tables
                .entry(format!("{}.{}", schema, name))
                .or_insert_with(|| TableInfo {
                    schema: schema.to_string(),
                    name: name.to_string(),
                    columns: Vec::new(),
                    foreign_keys: Vec::new(),
                })
                .columns
                .push(column);
        }

        for row in foreign_key_rows {
            let source = format!("{}.{}", field(row, "table_schema")?, field(row, "table_name")?);
            let fk = ForeignKeyRef {
                source_column: field(row, "column_name")?.to_string(),
                target_schema: field(row, "foreign_table_schema")?.to_string(),
                target_table: field(row, "foreign_table_name")?.to_string(),
                target_column: field(row, "foreign_column_name")?.to_string(),
            };
            if let Some(table) = tables.get_mut(&source) {
                table.foreign_keys.push(fk);
            }
        }

        Ok(Self {
            tables: tables.into_values().collect(),
        })
    }

    pub fn tables(&self) -> &[TableInfo] {
        &self.tables
    }
}

impl fmt::Display for SchemaDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tables and columns (with foreign keys):")?;
        for table in &self.tables {
            let qualified = table.qualified_name();
            let columns = table
                .columns
                .iter()
                .map(|c| format!("{}:{}", c.name, c.data_type))
                .collect::<Vec<_>>()
                .join(", ");
            write!(f, "\n- {} ({})", qualified, columns)?;
            for fk in &table.foreign_keys {
                write!(
                    f,
                    "\n  FK: {}.{} -> {}.{}.{}",
                    qualified, fk.source_column, fk.target_schema, fk.target_table, fk.target_column
                )?;
            }
        }
        Ok(())
    }
}
