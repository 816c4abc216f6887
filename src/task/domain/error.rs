//! Error types for task domain validation and parsing.

use super::{TaskGuid, TaskStatus};
use thiserror::Error;

/// Errors raised by the task lifecycle state machine.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The requested status change is not an edge of the lifecycle graph.
    #[error("illegal transition for task {guid}: {from} -> {to}")]
    IllegalTransition {
        /// Task whose transition was rejected.
        guid: TaskGuid,
        /// Status the task was in.
        from: TaskStatus,
        /// Status that was requested.
        to: TaskStatus,
    },
}

/// Error returned when text is not a canonical GUID.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("not a canonical GUID: {0:?}")]
pub struct ParseTaskGuidError(pub String);

/// Error returned while parsing task statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);
