//! HTTP routes for task submission and lookup.
//!
//! - `POST /task` records a task and answers `202` with its GUID.
//! - `GET /task/{guid}` answers `200` with the stored status and timestamp.
//!
//! Failures are answered with short plain-text bodies; see [`ApiError`].

use axum::{
    Json, Router,
    extract::{Path, State, rejection::PathRejection},
    http::StatusCode,
    routing::{get, post},
};
use chrono::SecondsFormat;
use mockable::Clock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::task::{
    domain::{TaskSnapshot, TaskStatus},
    ports::TaskRepository,
    services::TaskTrackingService,
};

mod error;

pub use error::{ApiError, INTERNAL_ERROR_MESSAGE, NOT_FOUND_MESSAGE, WRONG_GUID_MESSAGE};

type Result<T> = std::result::Result<T, ApiError>;

/// Body of a successful `POST /task`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitResponse {
    /// Canonical GUID of the new task.
    pub guid: String,
}

/// Body of a successful `GET /task/{guid}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStatusResponse {
    /// Current lifecycle status.
    pub status: TaskStatus,
    /// RFC 3339 time of the latest transition, UTC, whole seconds.
    pub timestamp: String,
}

impl From<TaskSnapshot> for TaskStatusResponse {
    fn from(snapshot: TaskSnapshot) -> Self {
        Self {
            status: snapshot.status,
            timestamp: snapshot.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}

/// Builds the task routes over `service`.
pub fn router<R, C>(service: TaskTrackingService<R, C>) -> Router
where
    R: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    Router::new()
        .route("/task", post(submit_task::<R, C>))
        .route("/task/{guid}", get(query_task::<R, C>))
        .with_state(service)
}

async fn submit_task<R, C>(
    State(service): State<TaskTrackingService<R, C>>,
) -> Result<(StatusCode, Json<SubmitResponse>)>
where
    R: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let submission = service.submit().await?;
    let body = SubmitResponse {
        guid: submission.guid().to_string(),
    };
    Ok((StatusCode::ACCEPTED, Json(body)))
}

async fn query_task<R, C>(
    path: std::result::Result<Path<String>, PathRejection>,
    State(service): State<TaskTrackingService<R, C>>,
) -> Result<Json<TaskStatusResponse>>
where
    R: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    // A segment that does not decode to UTF-8 cannot be a GUID either.
    let Path(guid) = path.map_err(|rejection| {
        debug!(error = %rejection, "rejected task identifier segment");
        ApiError::BadRequest
    })?;
    let snapshot = service.query(&guid).await?;
    Ok(Json(snapshot.into()))
}
