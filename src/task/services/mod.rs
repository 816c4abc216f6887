//! Application services for task submission, execution, and lookup.

mod runner;
mod tracking;

pub use runner::{RunHandle, TaskRunner};
pub use tracking::{Submission, TaskServiceError, TaskServiceResult, TaskTrackingService};
