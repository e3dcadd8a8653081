//! Request extractors that reject with an enveloped [`ApiError`].

use axum::extract::{FromRequest, FromRequestParts, Query};
use axum::http::request::Parts;
use maize_auth::{ResolveError, UserIdentity};

use crate::error::ApiError;

/// JSON body; malformed input becomes a 400 envelope.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Query string; malformed input becomes a 400 envelope.
#[derive(Debug, FromRequestParts)]
#[from_request(via(Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

/// The identity attached by [`require_identity`](crate::middleware::require_identity).
///
/// Only usable on routes behind that middleware; elsewhere it rejects as
/// unauthenticated.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserIdentity);

impl CurrentUser {
    /// Ownership filter for every query made on the caller's behalf.
    #[must_use]
    pub fn id(&self) -> &str {
        self.0.internal_id()
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<UserIdentity>()
            .cloned()
            .map(Self)
            .ok_or(ApiError::Resolve(ResolveError::Missing))
    }
}
