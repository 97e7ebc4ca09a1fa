pub mod description;
pub mod introspect;

pub use description::{Column, ForeignKeyRef, SchemaDescription, TableInfo};
pub use introspect::describe_schema;
