//! API error type and its envelope rendering.

use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use maize_auth::{ProviderError, ResolveError};
use maize_core::responses::Envelope;
use maize_db::error::DatabaseError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("{0}")]
    Internal(String),

    #[error("database error: {0}")]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Rejection for development-only endpoints when running in production.
    #[must_use]
    pub fn production_only() -> Self {
        Self::Forbidden("This endpoint is not available in production".into())
    }

    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message.clone()),
            Self::Forbidden(message) => (StatusCode::FORBIDDEN, message.clone()),
            Self::NotFound(message) => (StatusCode::NOT_FOUND, message.clone()),
            Self::PayloadTooLarge(message) => (StatusCode::PAYLOAD_TOO_LARGE, message.clone()),
            Self::Internal(message) => {
                tracing::error!(error = %message, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, message.clone())
            }
            Self::Database(e) => {
                tracing::error!("Database error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database operation failed".to_string(),
                )
            }
            Self::Resolve(e) => match e {
                ResolveError::Missing => (StatusCode::UNAUTHORIZED, e.to_string()),
                ResolveError::Invalid(reason) => {
                    tracing::debug!(reason = %reason, "credential rejected");
                    (
                        StatusCode::UNAUTHORIZED,
                        "Invalid or expired token".to_string(),
                    )
                }
                ResolveError::Transient(reason) => {
                    tracing::warn!(reason = %reason, "identity resolution unavailable");
                    (StatusCode::INTERNAL_SERVER_ERROR, reason.clone())
                }
                ResolveError::Conflict(reason) => (StatusCode::CONFLICT, reason.clone()),
            },
            Self::Provider(e) => match e {
                ProviderError::Rejected(reason) => (StatusCode::BAD_REQUEST, reason.clone()),
                ProviderError::Unavailable(_) => {
                    tracing::warn!("{e}");
                    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
                }
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        let body: Envelope<()> = Envelope::failure(message, status.as_u16());
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self::PayloadTooLarge("File too large".into())
        } else {
            Self::BadRequest(err.body_text())
        }
    }
}
