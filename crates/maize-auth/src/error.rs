use thiserror::Error;

/// Failure reported by an [`IdentityProvider`](crate::IdentityProvider).
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider refused the request: bad credential, expired token,
    /// duplicate account, malformed input.
    #[error("rejected by identity provider: {0}")]
    Rejected(String),

    /// The provider could not be reached or answered with a server error.
    #[error("identity provider unavailable: {0}")]
    Unavailable(String),
}

/// Failure reported by a [`UserDirectory`](crate::UserDirectory).
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// A create collided with an existing record on a unique column.
    #[error("unique constraint violated on {field}")]
    UniqueViolation { field: String },

    #[error("user directory unavailable: {0}")]
    Unavailable(String),
}

/// Why a request could not be given an identity.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// No credential on any channel.
    #[error("User not authenticated")]
    Missing,

    /// A credential was presented and rejected.
    #[error("Invalid or expired token: {0}")]
    Invalid(String),

    /// The provider or directory could not be consulted.
    #[error("{0}")]
    Transient(String),

    /// Provisioning collided with a record owned by a different subject.
    #[error("{0}")]
    Conflict(String),
}

impl ResolveError {
    /// True for failures that say "you are not who you claim".
    #[must_use]
    pub const fn is_authentication(&self) -> bool {
        matches!(self, Self::Missing | Self::Invalid(_))
    }
}

impl From<DirectoryError> for ResolveError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::UniqueViolation { field } => {
                Self::Conflict(format!("{field} is already registered"))
            }
            DirectoryError::Unavailable(msg) => Self::Transient(format!("user directory: {msg}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_missing_and_invalid_are_authentication_failures() {
        assert!(ResolveError::Missing.is_authentication());
        assert!(ResolveError::Invalid("expired".into()).is_authentication());
        assert!(!ResolveError::Transient("timeout".into()).is_authentication());
        assert!(!ResolveError::Conflict("email".into()).is_authentication());
    }

    #[test]
    fn directory_outage_maps_to_transient() {
        let err: ResolveError = DirectoryError::Unavailable("locked".into()).into();
        assert!(matches!(err, ResolveError::Transient(ref m) if m.contains("locked")));
    }
}
