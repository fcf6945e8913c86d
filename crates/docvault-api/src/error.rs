//! Maps domain `AppError` to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use docvault_core::error::{AppError, ErrorKind};

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
    /// Optional structured details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Handler error type: an [`AppError`] that knows how to become a response.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl<E> From<E> for ApiError
where
    E: Into<AppError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

/// Status code and error code for a kind.
pub fn status_for(kind: ErrorKind) -> (StatusCode, &'static str) {
    match kind {
        ErrorKind::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        ErrorKind::Validation => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        ErrorKind::Conflict => (StatusCode::CONFLICT, "CONFLICT"),
        ErrorKind::PayloadTooLarge => (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE"),
        ErrorKind::UnsupportedMediaType => {
            (StatusCode::UNSUPPORTED_MEDIA_TYPE, "UNSUPPORTED_MEDIA_TYPE")
        }
        ErrorKind::Internal
        | ErrorKind::Database
        | ErrorKind::Storage
        | ErrorKind::Configuration
        | ErrorKind::Serialization => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let (status, code) = status_for(err.kind);

        let body = if err.kind.is_server_error() {
            tracing::error!(kind = %err.kind, error = %err.message, source = ?err.source, "Request failed");
            ApiErrorResponse {
                error: code.to_string(),
                message: "Internal server error".to_string(),
                details: None,
            }
        } else {
            ApiErrorResponse {
                error: code.to_string(),
                message: err.message,
                details: err.details,
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn render(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = ApiError(err).into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_client_errors_keep_message_and_details() {
        let (status, body) = render(
            AppError::validation("Bad input").with_details(serde_json::json!({"name": ["required"]})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "VALIDATION_ERROR");
        assert_eq!(body["message"], "Bad input");
        assert_eq!(body["details"]["name"][0], "required");
    }

    #[tokio::test]
    async fn test_server_errors_are_masked() {
        let (status, body) = render(AppError::database("connection refused on 10.0.0.5")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "INTERNAL_ERROR");
        assert_eq!(body["message"], "Internal server error");
        assert!(body.get("details").is_none());
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_for(ErrorKind::NotFound).0, StatusCode::NOT_FOUND);
        assert_eq!(status_for(ErrorKind::Conflict).0, StatusCode::CONFLICT);
        assert_eq!(
            status_for(ErrorKind::PayloadTooLarge).0,
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            status_for(ErrorKind::UnsupportedMediaType).0,
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
        assert_eq!(
            status_for(ErrorKind::Storage).0,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
