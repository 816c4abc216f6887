//! `PostgreSQL` repository implementation for task record storage.

use super::{TableName, models::TaskRow};
use crate::task::{
    domain::{Task, TaskGuid, TaskStatus},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sql_types::{Timestamptz, Uuid as SqlUuid, Varchar};

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed task repository.
///
/// Each task is one row; single-row statements give the per-record atomicity
/// the port requires without explicit transactions.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: TaskPgPool,
    table: TableName,
}

impl PostgresTaskRepository {
    /// Creates a new repository over `table` from a connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool, table: TableName) -> Self {
        Self { pool, table }
    }

    /// Creates the task table and its GUID index when missing.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] when the DDL fails.
    pub async fn ensure_schema(&self) -> TaskRepositoryResult<()> {
        let ddl = create_table_sql(&self.table);
        self.run_blocking(move |connection| {
            connection
                .batch_execute(&ddl)
                .map_err(TaskRepositoryError::persistence)
        })
        .await
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn insert(&self, task: &Task) -> TaskRepositoryResult<()> {
        let guid = task.guid();
        let status = task.status();
        let timestamp = task.timestamp();
        let statement = format!(
            "INSERT INTO {} (guid, \"timestamp\", status) VALUES ($1, $2, $3)",
            self.table.quoted()
        );

        self.run_blocking(move |connection| {
            diesel::sql_query(statement)
                .bind::<SqlUuid, _>(guid.into_inner())
                .bind::<Timestamptz, _>(timestamp)
                .bind::<Varchar, _>(status.as_str())
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskRepositoryError::DuplicateTask(guid)
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, guid: TaskGuid) -> TaskRepositoryResult<Option<Task>> {
        let query = format!(
            "SELECT guid, \"timestamp\", status FROM {} WHERE guid = $1 LIMIT 1",
            self.table.quoted()
        );

        self.run_blocking(move |connection| {
            let row = diesel::sql_query(query)
                .bind::<SqlUuid, _>(guid.into_inner())
                .get_result::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn update_status(
        &self,
        guid: TaskGuid,
        status: TaskStatus,
        timestamp: DateTime<Utc>,
    ) -> TaskRepositoryResult<()> {
        let statement = format!(
            "UPDATE {} SET status = $1, \"timestamp\" = $2 WHERE guid = $3",
            self.table.quoted()
        );

        self.run_blocking(move |connection| {
            let affected = diesel::sql_query(statement)
                .bind::<Varchar, _>(status.as_str())
                .bind::<Timestamptz, _>(timestamp)
                .bind::<SqlUuid, _>(guid.into_inner())
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            if affected == 0 {
                return Err(TaskRepositoryError::NotFound(guid));
            }
            Ok(())
        })
        .await
    }
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        guid,
        timestamp,
        status: persisted_status,
    } = row;
    let status =
        TaskStatus::try_from(persisted_status.as_str()).map_err(TaskRepositoryError::persistence)?;
    Ok(Task::from_persisted(
        TaskGuid::from_uuid(guid),
        status,
        timestamp,
    ))
}

fn create_table_sql(table: &TableName) -> String {
    format!(
        concat!(
            "CREATE TABLE IF NOT EXISTS {table} (",
            "id BIGSERIAL PRIMARY KEY, ",
            "guid UUID NOT NULL, ",
            "\"timestamp\" TIMESTAMPTZ NOT NULL, ",
            "status VARCHAR(16) NOT NULL",
            "); ",
            "CREATE UNIQUE INDEX IF NOT EXISTS \"idx_{name}_guid\" ON {table} (guid);",
        ),
        table = table.quoted(),
        name = table.as_str(),
    )
}
