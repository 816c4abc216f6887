//! Shared world state for task lifecycle BDD scenarios.

use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use mockable::DefaultClock;
use rstest::fixture;
use tasktrack::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{TaskGuid, TaskSnapshot, TaskStatus},
    services::{RunHandle, TaskRunner, TaskServiceError, TaskTrackingService},
};

/// Service type used by the BDD world.
pub type TestTaskService = TaskTrackingService<InMemoryTaskRepository, DefaultClock>;

/// Scenario world for task lifecycle behaviour tests.
#[derive(Default)]
pub struct TaskLifecycleWorld {
    pub repository: Arc<InMemoryTaskRepository>,
    pub service: Option<TestTaskService>,
    pub submitted: Vec<TaskGuid>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub pending_run: Option<RunHandle>,
    pub last_run_status: Option<TaskStatus>,
    pub last_query: Option<Result<TaskSnapshot, TaskServiceError>>,
}

impl TaskLifecycleWorld {
    /// Builds the service over the world's repository.
    pub fn configure(&mut self, work_duration: Duration) {
        let clock = Arc::new(DefaultClock);
        let runner = TaskRunner::new(
            Arc::clone(&self.repository),
            Arc::clone(&clock),
            work_duration,
        );
        self.service = Some(TaskTrackingService::new(
            Arc::clone(&self.repository),
            clock,
            runner,
        ));
    }

    /// Returns the configured service.
    pub fn service(&self) -> Result<&TestTaskService, eyre::Report> {
        self.service
            .as_ref()
            .ok_or_else(|| eyre::eyre!("task service not configured in scenario world"))
    }

    /// Returns the most recently submitted identifier.
    pub fn last_submitted(&self) -> Result<TaskGuid, eyre::Report> {
        self.submitted
            .last()
            .copied()
            .ok_or_else(|| eyre::eyre!("no task submitted in scenario world"))
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> TaskLifecycleWorld {
    TaskLifecycleWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
