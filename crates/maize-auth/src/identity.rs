//! The request-scoped identity handed to every protected handler.

use maize_core::entities::User;
use serde_json::{Map, Value};

use crate::claims::IdentityClaims;

/// Which channel produced an identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentitySource {
    /// A verified `Authorization: Bearer` credential.
    Bearer,
    /// The unverified development header.
    DevHeader,
}

/// Canonical identity attached to a request.
///
/// Only [`IdentityResolver`](crate::IdentityResolver) can build one, so a
/// handler holding a `UserIdentity` knows resolution succeeded.
#[derive(Debug, Clone, PartialEq)]
pub struct UserIdentity {
    internal_id: String,
    subject_id: String,
    email: Option<String>,
    display_name: Option<String>,
    source: IdentitySource,
    claims: Map<String, Value>,
}

impl UserIdentity {
    /// Identity backed by a directory record. Stored profile fields win over
    /// the token's claims.
    pub(crate) fn from_record(user: &User, claims: IdentityClaims) -> Self {
        let display_name = if user.name.trim().is_empty() {
            claims.display_name
        } else {
            Some(user.name.clone())
        };
        Self {
            internal_id: user.id.clone(),
            subject_id: user.subject_id.clone().unwrap_or(claims.subject_id),
            email: user.email.clone().or(claims.email),
            display_name,
            source: IdentitySource::Bearer,
            claims: claims.extra,
        }
    }

    /// Minimal, non-persisted identity for the development header.
    pub(crate) fn development(user_id: &str) -> Self {
        Self {
            internal_id: user_id.to_string(),
            subject_id: user_id.to_string(),
            email: Some(format!("dev_{user_id}@test.com")),
            display_name: Some(format!("Dev User {user_id}")),
            source: IdentitySource::DevHeader,
            claims: Map::new(),
        }
    }

    /// Id used as the owner filter by every downstream query.
    #[must_use]
    pub fn internal_id(&self) -> &str {
        &self.internal_id
    }

    #[must_use]
    pub fn subject_id(&self) -> &str {
        &self.subject_id
    }

    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    #[must_use]
    pub const fn source(&self) -> IdentitySource {
        self.source
    }

    /// Passthrough claims from the verified token. Empty for dev identities.
    #[must_use]
    pub const fn claims(&self) -> &Map<String, Value> {
        &self.claims
    }
}
