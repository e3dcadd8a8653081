//! Success responses wrapped in the envelope.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use maize_core::responses::Envelope;
use serde::Serialize;

const DEFAULT_MESSAGE: &str = "Success";

/// A successful reply: HTTP status plus `{ success: true, message, data, statusCode }`.
#[derive(Debug)]
pub struct Reply<T> {
    status: StatusCode,
    body: Envelope<T>,
}

impl<T: Serialize> Reply<T> {
    /// 200 with the default message.
    pub fn ok(data: T) -> Self {
        Self::with_status(StatusCode::OK, data, DEFAULT_MESSAGE)
    }

    /// 200 with a custom message.
    pub fn message(data: T, message: impl Into<String>) -> Self {
        Self::with_status(StatusCode::OK, data, message)
    }

    /// 201 with a custom message.
    pub fn created(data: T, message: impl Into<String>) -> Self {
        Self::with_status(StatusCode::CREATED, data, message)
    }

    fn with_status(status: StatusCode, data: T, message: impl Into<String>) -> Self {
        Self {
            status,
            body: Envelope::ok(data, message, status.as_u16()),
        }
    }
}

impl<T: Serialize> IntoResponse for Reply<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
