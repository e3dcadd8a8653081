//! Request middleware: request ids and identity resolution.

use axum::extract::{Request, State};
use axum::http::HeaderValue;
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use maize_auth::ResolveError;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Clone, Debug)]
pub struct RequestId(pub String);

tokio::task_local! {
    static REQUEST_ID: String;
}

/// Id of the request being served on this task, if any.
#[must_use]
pub fn current_request_id() -> Option<String> {
    REQUEST_ID.try_with(Clone::clone).ok()
}

pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = Uuid::new_v4().to_string();
    req.extensions_mut().insert(RequestId(id.clone()));
    let mut resp = REQUEST_ID
        .scope(id.clone(), async move { next.run(req).await })
        .await;
    if let Ok(value) = HeaderValue::from_str(&id) {
        resp.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    resp
}

/// Resolve the caller's identity and attach it to the request.
///
/// Requests without a usable identity are answered here and never reach the
/// handler.
///
/// # Errors
///
/// Returns the resolver's failure rendered as an [`ApiError`]: 401 for a
/// missing or invalid credential, 500 when a dependency is unavailable, 409
/// for an unrecoverable provisioning conflict.
pub async fn require_identity(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let identity = {
        let headers = req.headers();
        let authorization = headers
            .get(AUTHORIZATION)
            .map(|value| {
                value.to_str().map_err(|_| {
                    ResolveError::Invalid("authorization header is not valid text".into())
                })
            })
            .transpose()?;
        let dev_user = headers
            .get(state.config.auth.dev_header.as_str())
            .and_then(|value| value.to_str().ok());
        state.resolver.resolve(authorization, dev_user).await?
    };

    tracing::debug!(
        user_id = identity.internal_id(),
        source = ?identity.source(),
        request_id = current_request_id().as_deref(),
        "identity resolved"
    );
    req.extensions_mut().insert(identity);
    Ok(next.run(req).await)
}
