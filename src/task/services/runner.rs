//! Detached execution of a task's lifecycle.

use crate::task::{
    domain::{TaskDomainError, TaskGuid, TaskStatus},
    ports::{TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::{JoinError, JoinHandle};
use tokio_util::task::TaskTracker;
use tracing::{error, info};

/// Reasons a run stops advancing before `Finished`.
#[derive(Debug, Error)]
enum RunError {
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
}

/// Handle to a single detached run.
///
/// Dropping the handle detaches the run; it keeps going in the background.
#[derive(Debug)]
pub struct RunHandle {
    guid: TaskGuid,
    join: JoinHandle<TaskStatus>,
}

impl RunHandle {
    /// Returns the GUID of the task being run.
    #[must_use]
    pub const fn guid(&self) -> TaskGuid {
        self.guid
    }

    /// Returns `true` once the run has stopped.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Waits for the run and returns the last status it wrote successfully.
    ///
    /// A run whose first write failed reports [`TaskStatus::Created`].
    ///
    /// # Errors
    ///
    /// Returns the [`JoinError`] when the run panicked.
    pub async fn wait(self) -> Result<TaskStatus, JoinError> {
        self.join.await
    }
}

/// Drives tasks through `Running` and `Finished`, one run per GUID.
///
/// Runs are spawned on a [`TaskTracker`] so shutdown can wait for them.
pub struct TaskRunner<R, C>
where
    R: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    repository: Arc<R>,
    clock: Arc<C>,
    work_duration: Duration,
    tracker: TaskTracker,
}

impl<R, C> Clone for TaskRunner<R, C>
where
    R: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            clock: Arc::clone(&self.clock),
            work_duration: self.work_duration,
            tracker: self.tracker.clone(),
        }
    }
}

impl<R, C> TaskRunner<R, C>
where
    R: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    /// Creates a runner whose placeholder work lasts `work_duration`.
    #[must_use]
    pub fn new(repository: Arc<R>, clock: Arc<C>, work_duration: Duration) -> Self {
        Self {
            repository,
            clock,
            work_duration,
            tracker: TaskTracker::new(),
        }
    }

    /// Returns the configured duration of the placeholder work.
    #[must_use]
    pub const fn work_duration(&self) -> Duration {
        self.work_duration
    }

    /// Starts the run for `guid` without waiting for it.
    ///
    /// Must be called exactly once per GUID, after its record was inserted.
    #[must_use = "dropping the handle detaches the run"]
    pub fn spawn(&self, guid: TaskGuid) -> RunHandle {
        let runner = self.clone();
        let join = self
            .tracker
            .spawn(async move { runner.execute(guid).await });
        RunHandle { guid, join }
    }

    /// Runs the lifecycle of `guid` to completion on the current task.
    ///
    /// Writes `Running`, waits out the work duration, then writes `Finished`.
    /// A failed write is logged and ends the run, leaving the record at its
    /// last written status. Returns that status.
    pub async fn execute(&self, guid: TaskGuid) -> TaskStatus {
        let mut current = TaskStatus::Created;
        if self.step(guid, &mut current, TaskStatus::Running).await {
            tokio::time::sleep(self.work_duration).await;
            self.step(guid, &mut current, TaskStatus::Finished).await;
        }
        current
    }

    /// Records one transition, logging the outcome. Returns `false` when the
    /// run has to stop.
    async fn step(&self, guid: TaskGuid, current: &mut TaskStatus, target: TaskStatus) -> bool {
        match self.advance(guid, current, target).await {
            Ok(()) => {
                info!(%guid, status = %target, "task status recorded");
                true
            }
            Err(err) => {
                error!(
                    %guid,
                    status = %target,
                    error = %err,
                    "failed to record task status, run abandoned"
                );
                false
            }
        }
    }

    async fn advance(
        &self,
        guid: TaskGuid,
        current: &mut TaskStatus,
        target: TaskStatus,
    ) -> Result<(), RunError> {
        let next = current.transition_to(guid, target)?;
        self.repository
            .update_status(guid, next, self.clock.utc())
            .await?;
        *current = next;
        Ok(())
    }

    /// Returns the number of runs still in flight.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// Stops accepting new runs and waits for in-flight runs to end.
    pub async fn shutdown(&self) {
        self.tracker.close();
        self.tracker.wait().await;
    }

    /// Like [`Self::shutdown`], but gives up after `grace`.
    ///
    /// Returns `true` when every run ended in time.
    pub async fn shutdown_within(&self, grace: Duration) -> bool {
        tokio::time::timeout(grace, self.shutdown()).await.is_ok()
    }
}
