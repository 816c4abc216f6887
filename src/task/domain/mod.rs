//! Domain model for task lifecycle tracking.
//!
//! The task domain models identifier parsing, the three-state lifecycle, and
//! the task record itself while keeping all infrastructure concerns outside
//! of the domain boundary.

mod error;
mod ids;
mod task;

pub use error::{ParseTaskGuidError, ParseTaskStatusError, TaskDomainError};
pub use ids::TaskGuid;
pub use task::{Task, TaskSnapshot, TaskStatus};
