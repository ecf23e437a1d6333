//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::db::repository::RepositoryError;
use crate::models::TimeParseError;

const INTERNAL_ERROR_MESSAGE: &str = "An unexpected error occurred. Please try again later.";

/// API error response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Error code for programmatic handling
    pub error_code: String,
    pub error_message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: code.into(),
            error_message: message.into(),
        }
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// A required query parameter was absent
    MissingParameter(&'static str),
    /// A parameter was present but unusable
    InvalidInput(String),
    InvalidTimeFormat(TimeParseError),
    /// Storage failure; logged and reported as a generic 500
    Repository(RepositoryError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingParameter(_)
            | AppError::InvalidInput(_)
            | AppError::InvalidTimeFormat(_) => StatusCode::BAD_REQUEST,
            AppError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = match self {
            AppError::MissingParameter(name) => ApiError::new(
                "MISSING_PARAMETER",
                format!("The '{}' parameter is required and cannot be empty.", name),
            ),
            AppError::InvalidInput(msg) => ApiError::new("INVALID_INPUT", msg),
            AppError::InvalidTimeFormat(e) => ApiError::new(
                "INVALID_TIME_FORMAT",
                format!(
                    "Invalid time format provided. Please ensure it's a valid time string. {}",
                    e
                ),
            ),
            AppError::Repository(e) => {
                tracing::error!("Repository error: {}", e);
                ApiError::new("INTERNAL_SERVER_ERROR", INTERNAL_ERROR_MESSAGE)
            }
        };

        (status, Json(error)).into_response()
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::Repository(err)
    }
}

impl From<TimeParseError> for AppError {
    fn from(err: TimeParseError) -> Self {
        AppError::InvalidTimeFormat(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_wire_names() {
        let json = serde_json::to_value(ApiError::new("INVALID_INPUT", "bad")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"errorCode": "INVALID_INPUT", "errorMessage": "bad"})
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::MissingParameter("timeOfDay").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Repository(RepositoryError::connection("down")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_repository_error_body_is_generic() {
        let err = AppError::from(RepositoryError::query("relation \"deals\" does not exist"));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: ApiError = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.error_code, "INTERNAL_SERVER_ERROR");
        assert_eq!(body.error_message, INTERNAL_ERROR_MESSAGE);
    }
}
