//! Application error types.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use hearth_core::password::CaptureError;
use hearth_core::preferences::PreferenceError;
use hearth_core::relay::RelayError;
use thiserror::Error;
use tracing::error;

use crate::models::ErrorResponse;

/// Message shown to callers when the model could not be reached.
pub const UNAVAILABLE_MESSAGE: &str = "Sorry, I encountered an issue. Please try again later.";

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level errors with HTTP status mapping.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Internal server error")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Upstream and internal details stay in the log.
        let (status, message) = match self {
            AppError::Validation(m) => (StatusCode::BAD_REQUEST, m),
            AppError::Upstream(detail) => {
                error!(%detail, "upstream model call failed");
                (StatusCode::INTERNAL_SERVER_ERROR, UNAVAILABLE_MESSAGE.to_string())
            }
            AppError::Internal(detail) => {
                error!(%detail, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        AppError::Validation(e.body_text())
    }
}

impl From<RelayError> for AppError {
    fn from(e: RelayError) -> Self {
        match e {
            RelayError::InvalidRequest(msg) => AppError::Validation(msg),
            RelayError::Upstream(e) => AppError::Upstream(e.to_string()),
        }
    }
}

impl From<PreferenceError> for AppError {
    fn from(e: PreferenceError) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl From<CaptureError> for AppError {
    fn from(e: CaptureError) -> Self {
        AppError::Internal(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use hearth_core::gemini::UpstreamError;

    use super::*;

    async fn body_of(resp: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn validation_maps_to_bad_request_with_message() {
        let resp = AppError::Validation("username is required".into()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_of(resp).await["error"], "username is required");
    }

    #[tokio::test]
    async fn upstream_detail_is_not_exposed() {
        let err = AppError::from(RelayError::Upstream(UpstreamError::Status {
            status: 403,
            message: "API key leaked".into(),
        }));
        let resp = err.into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_of(resp).await;
        assert_eq!(body["error"], UNAVAILABLE_MESSAGE);
        assert!(!body.to_string().contains("leaked"));
    }

    #[test]
    fn unknown_preference_field_is_validation() {
        let err = AppError::from(PreferenceError::UnknownField("mood".into()));
        assert!(matches!(err, AppError::Validation(m) if m.contains("mood")));
    }

    #[test]
    fn invalid_chat_request_is_validation() {
        let err = AppError::from(RelayError::InvalidRequest("message is required".into()));
        assert!(matches!(err, AppError::Validation(_)));
    }
}
