//! API error responses
//!
//! Maps the domain error taxonomy onto HTTP status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use crate::utils::errors::EventBoardError;

/// Wrapper turning domain errors into HTTP responses
#[derive(Debug)]
pub struct ApiError(pub EventBoardError);

impl From<EventBoardError> for ApiError {
    fn from(err: EventBoardError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            EventBoardError::Authentication(_) => StatusCode::UNAUTHORIZED,
            EventBoardError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            EventBoardError::RequestNotFound { .. }
            | EventBoardError::EventNotFound { .. }
            | EventBoardError::DepartmentNotFound { .. } => StatusCode::NOT_FOUND,
            EventBoardError::Validation(_)
            | EventBoardError::InvalidInput(_)
            | EventBoardError::InvalidStateTransition { .. } => StatusCode::BAD_REQUEST,
            _ => {
                error!(error = %self.0, "Unhandled internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = if status == StatusCode::INTERNAL_SERVER_ERROR {
            json!({ "error": "Internal server error" })
        } else {
            json!({ "error": self.0.to_string() })
        };

        (status, Json(body)).into_response()
    }
}

/// Result alias for handler functions
pub type ApiResult<T> = std::result::Result<T, ApiError>;
