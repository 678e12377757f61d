use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use crate::llm_client::CallFailure;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Session not found: {0}")]
    SessionNotFound(Uuid),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Planning failed: {0}")]
    PlanningFailure(String),

    #[error("LLM error: {0}")]
    Llm(#[from] CallFailure),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::SessionNotFound(id) => (
                StatusCode::NOT_FOUND,
                "SESSION_NOT_FOUND",
                format!("Interview session {id} does not exist or has finished"),
            ),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::PlanningFailure(msg) => {
                tracing::error!("Planning failure: {msg}");
                (StatusCode::BAD_GATEWAY, "PLANNING_FAILURE", msg.clone())
            }
            AppError::Llm(failure) => {
                tracing::error!("LLM error: {failure}");
                if failure.is_transient() {
                    (
                        StatusCode::SERVICE_UNAVAILABLE,
                        "LLM_UNAVAILABLE",
                        format!("The model is unavailable: {}", failure.message()),
                    )
                } else {
                    (
                        StatusCode::BAD_GATEWAY,
                        "LLM_ERROR",
                        format!("The model call failed: {}", failure.message()),
                    )
                }
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
