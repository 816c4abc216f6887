//! Task record and the lifecycle state machine.

use super::{ParseTaskStatusError, TaskDomainError, TaskGuid};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task lifecycle status.
///
/// The lifecycle is strictly linear: `Created -> Running -> Finished`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Task has been recorded but its run has not started.
    Created,
    /// The placeholder work is in progress.
    Running,
    /// The run completed.
    Finished,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Running => "running",
            Self::Finished => "finished",
        }
    }

    /// Returns the status that legally follows this one, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Created => Some(Self::Running),
            Self::Running => Some(Self::Finished),
            Self::Finished => None,
        }
    }

    /// Returns `true` when `target` is the single legal successor.
    #[must_use]
    pub fn can_transition_to(self, target: Self) -> bool {
        self.next() == Some(target)
    }

    /// Returns `true` for the terminal status.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Finished)
    }

    /// Validates a transition of task `guid` from `self` to `target`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::IllegalTransition`] when `target` is not the
    /// successor of `self`.
    pub fn transition_to(self, guid: TaskGuid, target: Self) -> Result<Self, TaskDomainError> {
        if self.can_transition_to(target) {
            Ok(target)
        } else {
            Err(TaskDomainError::IllegalTransition {
                guid,
                from: self,
                to: target,
            })
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "created" => Ok(Self::Created),
            "running" => Ok(Self::Running),
            "finished" => Ok(Self::Finished),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

/// Point-in-time view of a task as reported to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSnapshot {
    /// Current lifecycle status.
    pub status: TaskStatus,
    /// Moment of the most recent status transition.
    pub timestamp: DateTime<Utc>,
}

/// Task record: one per submitted unit of work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    guid: TaskGuid,
    status: TaskStatus,
    timestamp: DateTime<Utc>,
}

impl Task {
    /// Creates a fresh task in [`TaskStatus::Created`].
    #[must_use]
    pub fn new(clock: &impl Clock) -> Self {
        Self {
            guid: TaskGuid::new(),
            status: TaskStatus::Created,
            timestamp: clock.utc(),
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub const fn from_persisted(
        guid: TaskGuid,
        status: TaskStatus,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            guid,
            status,
            timestamp,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn guid(&self) -> TaskGuid {
        self.guid
    }

    /// Returns the current status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the timestamp of the most recent transition.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Returns the client-facing view of this task.
    #[must_use]
    pub const fn snapshot(&self) -> TaskSnapshot {
        TaskSnapshot {
            status: self.status,
            timestamp: self.timestamp,
        }
    }

    /// Overwrites status and timestamp without consulting the lifecycle graph.
    ///
    /// Stores apply writes as given; ordering is the runner's responsibility.
    pub const fn overwrite_status(&mut self, status: TaskStatus, timestamp: DateTime<Utc>) {
        self.status = status;
        self.timestamp = timestamp;
    }
}
