//! `PostgreSQL` adapters for task record persistence.

mod models;
mod repository;
mod table;

pub use repository::{PostgresTaskRepository, TaskPgPool};
pub use table::{InvalidTableName, TableName};
