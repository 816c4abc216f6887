//! Submission and query entry points for task tracking.

use super::{RunHandle, TaskRunner};
use crate::task::{
    domain::{ParseTaskGuidError, Task, TaskGuid, TaskSnapshot},
    ports::{TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info};

/// Service-level errors for task submission and lookup.
#[derive(Debug, Error)]
pub enum TaskServiceError {
    /// The identifier text is not a canonical GUID.
    #[error(transparent)]
    MalformedIdentifier(#[from] ParseTaskGuidError),
    /// No task has the given GUID.
    #[error("task {0} not found")]
    NotFound(TaskGuid),
    /// The task record could not be stored.
    #[error("task submission failed: {0}")]
    SubmissionFailed(#[source] TaskRepositoryError),
    /// The task record could not be read.
    #[error("task query failed: {0}")]
    QueryFailed(#[source] TaskRepositoryError),
}

/// Result type for task tracking service operations.
pub type TaskServiceResult<T> = Result<T, TaskServiceError>;

/// Outcome of a successful submission.
#[derive(Debug)]
pub struct Submission {
    guid: TaskGuid,
    run: RunHandle,
}

impl Submission {
    /// Returns the GUID issued for the task.
    #[must_use]
    pub const fn guid(&self) -> TaskGuid {
        self.guid
    }

    /// Returns the handle of the detached run.
    #[must_use]
    pub fn into_run(self) -> RunHandle {
        self.run
    }
}

/// Task tracking facade: submit work, query its status.
pub struct TaskTrackingService<R, C>
where
    R: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    repository: Arc<R>,
    clock: Arc<C>,
    runner: TaskRunner<R, C>,
}

impl<R, C> Clone for TaskTrackingService<R, C>
where
    R: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            clock: Arc::clone(&self.clock),
            runner: self.runner.clone(),
        }
    }
}

impl<R, C> TaskTrackingService<R, C>
where
    R: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    /// Creates a new tracking service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>, runner: TaskRunner<R, C>) -> Self {
        Self {
            repository,
            clock,
            runner,
        }
    }

    /// Returns the runner executing submitted tasks.
    #[must_use]
    pub const fn runner(&self) -> &TaskRunner<R, C> {
        &self.runner
    }

    /// Records a new task and starts its run without waiting for it.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::SubmissionFailed`] when the record cannot
    /// be stored; no run is started in that case.
    pub async fn submit(&self) -> TaskServiceResult<Submission> {
        let task = Task::new(&*self.clock);
        let guid = task.guid();

        if let Err(err) = self.repository.insert(&task).await {
            error!(%guid, error = %err, "failed to store new task");
            return Err(TaskServiceError::SubmissionFailed(err));
        }

        let run = self.runner.spawn(guid);
        info!(%guid, "task submitted");
        Ok(Submission { guid, run })
    }

    /// Resolves identifier text to the task's stored status and timestamp.
    ///
    /// Reports exactly what the store holds; elapsed time is never used to
    /// infer progress.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::MalformedIdentifier`] for non-GUID text,
    /// [`TaskServiceError::NotFound`] for unknown GUIDs, and
    /// [`TaskServiceError::QueryFailed`] when the lookup fails.
    pub async fn query(&self, text: &str) -> TaskServiceResult<TaskSnapshot> {
        let guid = TaskGuid::parse(text).inspect_err(|err| {
            debug!(error = %err, "rejected task identifier");
        })?;

        match self.repository.find_by_id(guid).await {
            Ok(Some(task)) => Ok(task.snapshot()),
            Ok(None) => {
                debug!(%guid, "task not found");
                Err(TaskServiceError::NotFound(guid))
            }
            Err(err) => {
                error!(%guid, error = %err, "failed to look up task");
                Err(TaskServiceError::QueryFailed(err))
            }
        }
    }
}
