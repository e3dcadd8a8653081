use async_trait::async_trait;

use crate::claims::IdentityClaims;
use crate::error::ProviderError;

/// Input for [`IdentityProvider::create_account`].
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub password: String,
    pub name: String,
}

/// External identity provider.
///
/// Implementations own whatever client state they need (HTTP client, key
/// cache); the process entry point constructs one and shares it behind an
/// `Arc`.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Verify a bearer credential and return its claims.
    async fn verify(&self, credential: &str) -> Result<IdentityClaims, ProviderError>;

    /// Authoritative profile for a subject, or `None` if the provider has no
    /// such account.
    async fn fetch_by_subject_id(
        &self,
        subject_id: &str,
    ) -> Result<Option<IdentityClaims>, ProviderError>;

    /// Register a new account with email and password.
    async fn create_account(&self, account: &NewAccount) -> Result<IdentityClaims, ProviderError>;

    /// Mint a one-time sign-in token the client exchanges for a session.
    async fn issue_sign_in_token(&self, subject_id: &str) -> Result<String, ProviderError>;
}

/// Provider used when no Clerk secret is configured. Every call reports the
/// provider as unavailable, so bearer requests fail as transient rather than
/// as bad credentials.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredProvider;

const NOT_CONFIGURED: &str = "clerk.secret_key is not set";

#[async_trait]
impl IdentityProvider for UnconfiguredProvider {
    async fn verify(&self, _credential: &str) -> Result<IdentityClaims, ProviderError> {
        Err(ProviderError::Unavailable(NOT_CONFIGURED.into()))
    }

    async fn fetch_by_subject_id(
        &self,
        _subject_id: &str,
    ) -> Result<Option<IdentityClaims>, ProviderError> {
        Err(ProviderError::Unavailable(NOT_CONFIGURED.into()))
    }

    async fn create_account(&self, _account: &NewAccount) -> Result<IdentityClaims, ProviderError> {
        Err(ProviderError::Unavailable(NOT_CONFIGURED.into()))
    }

    async fn issue_sign_in_token(&self, _subject_id: &str) -> Result<String, ProviderError> {
        Err(ProviderError::Unavailable(NOT_CONFIGURED.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unconfigured_provider_is_unavailable() {
        let err = UnconfiguredProvider.verify("token").await.unwrap_err();
        assert!(matches!(err, ProviderError::Unavailable(_)));
    }
}
