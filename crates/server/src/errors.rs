use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use models::ValidationErrors;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::error;

pub const CHARACTER_NOT_FOUND: &str = "Marvel character not found";

/// Handler-boundary error; every variant renders as a JSON body.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Marvel character not found")]
    NotFound,
    #[error("validation error: {0}")]
    Validation(ValidationErrors),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::NotFound(_) => ApiError::NotFound,
            ServiceError::Validation(errors) => ApiError::Validation(errors),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({"error": CHARACTER_NOT_FOUND})),
            )
                .into_response(),
            // 字段 → 错误信息，与请求体结构一一对应
            ApiError::Validation(errors) => (StatusCode::BAD_REQUEST, Json(errors)).into_response(),
            ApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, Json(serde_json::json!({"error": msg}))).into_response()
            }
            ApiError::Internal(msg) => {
                error!(error = %msg, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(serde_json::json!({"error": msg})),
                )
                    .into_response()
            }
        }
    }
}
