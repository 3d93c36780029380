use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::tracker::TrackerError;

#[derive(Debug)]
pub enum ApiError {
    Validation(String),
    NotFound(String),
    Conflict(&'static str),
    Unavailable(&'static str),
}

impl From<TrackerError> for ApiError {
    fn from(e: TrackerError) -> Self {
        match e {
            TrackerError::AlreadyRunning => ApiError::Conflict("tracker_running"),
            TrackerError::NotRunning => ApiError::Unavailable("tracker_not_running"),
            TrackerError::QueueFull => ApiError::Unavailable("event_queue_full"),
            TrackerError::UnknownSatellite(id) | TrackerError::MarkerNotFound(id) => {
                ApiError::NotFound(id)
            }
            other => ApiError::Validation(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::with_message("validation_failed", &msg)),
            )
                .into_response(),
            ApiError::NotFound(id) => (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::with_message("satellite_not_found", &id)),
            )
                .into_response(),
            ApiError::Conflict(reason) => {
                (StatusCode::CONFLICT, Json(ErrorResponse::new(reason))).into_response()
            }
            ApiError::Unavailable(reason) => (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse::new(reason)),
            )
                .into_response(),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: &str) -> Self {
        ErrorResponse {
            error: error.to_string(),
            message: None,
        }
    }

    pub fn with_message(error: &str, message: &str) -> Self {
        ErrorResponse {
            error: error.to_string(),
            message: Some(message.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracker_errors_map_to_statuses() {
        let status = |e: TrackerError| ApiError::from(e).into_response().status();
        assert_eq!(status(TrackerError::AlreadyRunning), StatusCode::CONFLICT);
        assert_eq!(status(TrackerError::NotRunning), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(status(TrackerError::QueueFull), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            status(TrackerError::UnknownSatellite("starlink-9".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(status(TrackerError::NonFinite), StatusCode::BAD_REQUEST);
    }
}
