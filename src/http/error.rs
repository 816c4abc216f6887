use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::task::services::TaskServiceError;

/// Body for identifiers that fail to parse.
pub const WRONG_GUID_MESSAGE: &str = "It's not a GUID";
/// Body for unknown identifiers.
pub const NOT_FOUND_MESSAGE: &str = "Not found";
/// Body for every infrastructure failure.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

/// Error type for the axum routes.
///
/// Infrastructure details are logged where they occur and never reach the
/// client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiError {
    /// The path segment is not a GUID.
    BadRequest,
    /// No task has the requested GUID.
    NotFound,
    /// The store failed.
    Internal,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::BadRequest => (StatusCode::BAD_REQUEST, WRONG_GUID_MESSAGE).into_response(),
            Self::NotFound => (StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE).into_response(),
            Self::Internal => {
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE).into_response()
            }
        }
    }
}

impl From<TaskServiceError> for ApiError {
    fn from(error: TaskServiceError) -> Self {
        match error {
            TaskServiceError::MalformedIdentifier(_) => Self::BadRequest,
            TaskServiceError::NotFound(_) => Self::NotFound,
            TaskServiceError::SubmissionFailed(_) | TaskServiceError::QueryFailed(_) => {
                Self::Internal
            }
        }
    }
}
