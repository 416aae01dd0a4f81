use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use discotheque_db::{sea_orm::DbErr, FieldError, StoreError};
use discotheque_media::StorageError;
use serde_json::json;
use thiserror::Error;

/// Failures surfaced by the HTTP handlers.
///
/// The first four variants are client errors answered locally; the rest are
/// passed to the generic 500 response and logged.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("validation failed on {} field(s)", .0.len())]
    ValidationFailed(Vec<FieldError>),

    #[error("multipart error: {0}")]
    Multipart(#[from] MultipartError),

    #[error("database error: {0}")]
    Database(#[from] DbErr),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation(errors) => ApiError::ValidationFailed(errors),
            StoreError::Database(e) => ApiError::Database(e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::InvalidIdentifier(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg).into_response(),
            ApiError::ValidationFailed(errors) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "errors": errors }))).into_response()
            }
            ApiError::Multipart(e) => (e.status(), e.body_text()).into_response(),
            ApiError::Database(ref e) => {
                tracing::error!("database error: {e}");
                internal_error()
            }
            ApiError::Storage(ref e) => {
                tracing::error!("storage error: {e}");
                internal_error()
            }
        }
    }
}

fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error".to_string(),
    )
        .into_response()
}
