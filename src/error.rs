use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

// Core errors raised by the ingestion service
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IngestError {
    #[error("Invalid ID: {id}. Must be between {min} and {max}")]
    Validation { id: i64, min: u64, max: u64 },
    #[error("ids must contain at least one id")]
    EmptyRequest,
    #[error("Ingestion not found: {0}")]
    NotFound(String),
    #[error("Batch scheduler is not running")]
    SchedulerUnavailable,
}

#[derive(Error, Debug, Serialize, Clone)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

impl From<IngestError> for ApiError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::Validation { .. } | IngestError::EmptyRequest => {
                Self::ValidationError(err.to_string())
            }
            IngestError::NotFound(_) => Self::NotFound(err.to_string()),
            IngestError::SchedulerUnavailable => {
                tracing::error!("Rejecting request: {}", err);
                Self::Unavailable(err.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::ValidationError(message) => (StatusCode::BAD_REQUEST, message),
            Self::NotFound(message) => (StatusCode::NOT_FOUND, message),
            Self::Unavailable(message) => (StatusCode::SERVICE_UNAVAILABLE, message),
        };

        (
            status,
            Json(ErrorResponse {
                error: message,
                status: "error".to_string(),
            }),
        )
            .into_response()
    }
}

#[derive(Serialize, Debug)]
struct ErrorResponse {
    error: String,
    status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: IngestError) -> StatusCode {
        ApiError::from(err).into_response().status()
    }

    #[test]
    fn test_validation_error_names_offending_id() {
        let err = IngestError::Validation {
            id: 0,
            min: 1,
            max: 1_000_000_007,
        };

        assert_eq!(
            err.to_string(),
            "Invalid ID: 0. Must be between 1 and 1000000007"
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            status_of(IngestError::Validation {
                id: -5,
                min: 1,
                max: 10
            }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_of(IngestError::EmptyRequest), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_of(IngestError::NotFound("abc".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(IngestError::SchedulerUnavailable),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
