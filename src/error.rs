use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::generation::GenerationError;
use crate::store::StoreError;
use crate::sync::SyncError;
use crate::validation::ValidationError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not Found: {0}")]
    NotFound(String),
    #[error("Bad Request: {0}")]
    BadRequest(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Bad Gateway: {0}")]
    BadGateway(String),
    #[error("Gateway Timeout: {0}")]
    GatewayTimeout(String),
    #[error("Internal Error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::BadGateway(msg) => {
                tracing::warn!("Upstream failure: {msg}");
                (StatusCode::BAD_GATEWAY, msg.clone())
            }
            AppError::GatewayTimeout(msg) => {
                tracing::warn!("Upstream timeout: {msg}");
                (StatusCode::GATEWAY_TIMEOUT, msg.clone())
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => AppError::NotFound(err.to_string()),
            StoreError::SyncInProgress => AppError::Conflict(err.to_string()),
            StoreError::Invalid(_) | StoreError::ImmutableField(_) => {
                AppError::BadRequest(err.to_string())
            }
            StoreError::Sync(e) => e.into(),
        }
    }
}

impl From<GenerationError> for AppError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::Timeout(_) => AppError::GatewayTimeout(err.to_string()),
            _ => AppError::BadGateway(err.to_string()),
        }
    }
}

impl From<SyncError> for AppError {
    fn from(err: SyncError) -> Self {
        match err {
            SyncError::Timeout(_) => AppError::GatewayTimeout(err.to_string()),
            _ => AppError::BadGateway(err.to_string()),
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}
