use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::ports::RepositoryError;
use crate::application::services::{AuditionError, SubmissionError};
use crate::domain::ScriptId;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Error body shared by the script handlers.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn script_not_found(script_id: ScriptId) -> Self {
        Self::not_found(format!("Script not found: {}", script_id))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, error = %self.message, "Request failed");
        }
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}

impl From<RepositoryError> for ApiError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound(what) => Self::not_found(format!("Not found: {}", what)),
            RepositoryError::ConstraintViolation(reason) => Self::new(StatusCode::CONFLICT, reason),
            other => Self::new(StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
        }
    }
}

impl From<SubmissionError> for ApiError {
    fn from(e: SubmissionError) -> Self {
        match e {
            SubmissionError::EmptyUpload => Self::bad_request(e.to_string()),
            SubmissionError::NotFound(id) => Self::script_not_found(id),
            SubmissionError::AlreadyRunning(_) => Self::new(StatusCode::CONFLICT, e.to_string()),
            SubmissionError::QueueUnavailable => {
                Self::new(StatusCode::SERVICE_UNAVAILABLE, e.to_string())
            }
            SubmissionError::Storage(_) | SubmissionError::Repository(_) => {
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        }
    }
}

impl From<AuditionError> for ApiError {
    fn from(e: AuditionError) -> Self {
        match e {
            AuditionError::Speech(_) => Self::new(StatusCode::BAD_GATEWAY, e.to_string()),
            AuditionError::Storage(_) => {
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        }
    }
}

pub fn parse_script_id(raw: &str) -> Result<ScriptId, ApiError> {
    uuid::Uuid::parse_str(raw)
        .map(ScriptId::from_uuid)
        .map_err(|_| ApiError::bad_request(format!("Invalid script ID: {}", raw)))
}
