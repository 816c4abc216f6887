//! Diesel row models for task persistence.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for task records.
///
/// The store-internal `id` column is never selected.
#[derive(Debug, Clone, QueryableByName)]
pub struct TaskRow {
    /// Task GUID in its 16-byte binary form.
    #[diesel(sql_type = diesel::sql_types::Uuid)]
    pub guid: uuid::Uuid,
    /// Timestamp of the latest status transition.
    #[diesel(sql_type = diesel::sql_types::Timestamptz)]
    pub timestamp: DateTime<Utc>,
    /// Lifecycle status in storage form.
    #[diesel(sql_type = diesel::sql_types::Varchar)]
    pub status: String,
}
