//! Repository port for task record persistence.

use crate::task::domain::{Task, TaskGuid, TaskStatus};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task record persistence contract.
///
/// Implementations must keep each record's read and write atomic so that a
/// lookup overlapping an update observes either the old or the new status,
/// never a torn record. Cross-record transactions are not required.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task record.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the GUID already
    /// exists or [`TaskRepositoryError::Persistence`] on storage failure.
    async fn insert(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Finds a task by its GUID.
    ///
    /// Returns `None` when no record exists.
    async fn find_by_id(&self, guid: TaskGuid) -> TaskRepositoryResult<Option<Task>>;

    /// Overwrites status and timestamp of an existing record.
    ///
    /// The source status is not validated here.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when no record matches.
    async fn update_status(
        &self,
        guid: TaskGuid,
        status: TaskStatus,
        timestamp: DateTime<Utc>,
    ) -> TaskRepositoryResult<()>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same GUID already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskGuid),

    /// No task record matches the GUID.
    #[error("task not found: {0}")]
    NotFound(TaskGuid),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
