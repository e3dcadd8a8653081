//! Identity resolution and first-login provisioning.
//!
//! Resolution order:
//! 1. `Authorization` header present: it must be `Bearer <credential>`, and
//!    the credential must verify. Failure is terminal; the development header
//!    is never consulted once an `Authorization` header is seen.
//! 2. The verified subject is looked up in the directory and provisioned on
//!    first sight.
//! 3. No `Authorization` header: the development header (when enabled) is
//!    taken as both subject and internal id, with no directory access.
//! 4. Nothing usable: [`ResolveError::Missing`].

use std::sync::Arc;
use std::time::Duration;

use maize_core::entities::{NewUser, User};

use crate::claims::IdentityClaims;
use crate::directory::UserDirectory;
use crate::error::{DirectoryError, ProviderError, ResolveError};
use crate::identity::UserIdentity;
use crate::provider::IdentityProvider;

#[derive(Debug, Clone, Copy)]
pub struct ResolverSettings {
    /// Accept the raw development header when no `Authorization` is sent.
    pub dev_header_enabled: bool,
    /// Upper bound on a single provider round trip.
    pub verify_timeout: Duration,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            dev_header_enabled: false,
            verify_timeout: Duration::from_secs(5),
        }
    }
}

/// Outcome of [`IdentityResolver::provision`].
#[derive(Debug, Clone)]
pub struct Provisioned {
    pub user: User,
    /// True only when this call performed the create.
    pub created: bool,
}

#[derive(Clone)]
pub struct IdentityResolver {
    provider: Arc<dyn IdentityProvider>,
    directory: Arc<dyn UserDirectory>,
    settings: ResolverSettings,
}

/// Credential from an `Authorization` header value, if it is a non-empty
/// bearer credential. The scheme is matched case-insensitively.
#[must_use]
pub fn bearer_credential(header: &str) -> Option<&str> {
    let (scheme, credential) = header.trim().split_once(' ')?;
    let credential = credential.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !credential.is_empty()).then_some(credential)
}

impl IdentityResolver {
    #[must_use]
    pub fn new(
        provider: Arc<dyn IdentityProvider>,
        directory: Arc<dyn UserDirectory>,
        settings: ResolverSettings,
    ) -> Self {
        Self {
            provider,
            directory,
            settings,
        }
    }

    #[must_use]
    pub fn provider(&self) -> &Arc<dyn IdentityProvider> {
        &self.provider
    }

    #[must_use]
    pub const fn settings(&self) -> ResolverSettings {
        self.settings
    }

    /// Resolve the identity for one request.
    ///
    /// `authorization` is the raw `Authorization` header value; `dev_user` is
    /// the raw development header value. Blank development values count as
    /// absent.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::Missing`] when neither channel carries a credential.
    /// - [`ResolveError::Invalid`] when the `Authorization` header is not a
    ///   bearer credential or the provider rejects it.
    /// - [`ResolveError::Transient`] when the provider or directory fails.
    /// - [`ResolveError::Conflict`] when provisioning collides on email with a
    ///   different subject.
    pub async fn resolve(
        &self,
        authorization: Option<&str>,
        dev_user: Option<&str>,
    ) -> Result<UserIdentity, ResolveError> {
        if let Some(header) = authorization {
            let credential = bearer_credential(header).ok_or_else(|| {
                ResolveError::Invalid("authorization header is not a bearer credential".into())
            })?;
            let claims = self.verify_credential(credential).await?;
            let provisioned = self.provision(&claims).await?;
            return Ok(UserIdentity::from_record(&provisioned.user, claims));
        }

        if self.settings.dev_header_enabled {
            if let Some(user_id) = dev_user.map(str::trim).filter(|v| !v.is_empty()) {
                tracing::debug!(user_id, "resolved identity from development header");
                return Ok(UserIdentity::development(user_id));
            }
        }

        Err(ResolveError::Missing)
    }

    /// Verify a credential with the provider, bounded by the configured
    /// timeout.
    ///
    /// # Errors
    ///
    /// `Invalid` on rejection, `Transient` on outage or timeout.
    pub async fn verify_credential(&self, credential: &str) -> Result<IdentityClaims, ResolveError> {
        let verified =
            tokio::time::timeout(self.settings.verify_timeout, self.provider.verify(credential))
                .await
                .map_err(|_| {
                    tracing::warn!(
                        timeout = ?self.settings.verify_timeout,
                        "identity provider verification timed out"
                    );
                    ResolveError::Transient("identity provider timed out".into())
                })?;

        verified.map_err(|e| match e {
            ProviderError::Rejected(msg) => {
                tracing::debug!(reason = %msg, "credential rejected");
                ResolveError::Invalid(msg)
            }
            ProviderError::Unavailable(msg) => {
                tracing::warn!(error = %msg, "identity provider unavailable");
                ResolveError::Transient(format!("identity provider: {msg}"))
            }
        })
    }

    /// Find the record for a verified subject, creating it on first login.
    ///
    /// Behaves as an upsert keyed on subject id: when a concurrent create wins
    /// the race, the unique violation is answered by re-reading the winner's
    /// record.
    ///
    /// # Errors
    ///
    /// `Transient` when the directory or provider fails, `Conflict` when the
    /// email belongs to a different subject.
    pub async fn provision(&self, claims: &IdentityClaims) -> Result<Provisioned, ResolveError> {
        if let Some(user) = self.directory.find_by_subject_id(&claims.subject_id).await? {
            return Ok(Provisioned {
                user,
                created: false,
            });
        }

        let profile = self.provisioning_profile(claims).await?;
        let new_user = NewUser {
            subject_id: Some(profile.subject_id.clone()),
            name: profile.provisioning_name(),
            email: profile.email.clone(),
            photo_url: profile.photo_url.clone(),
        };

        match self.directory.create(new_user).await {
            Ok(user) => {
                tracing::info!(
                    user_id = %user.id,
                    subject_id = %claims.subject_id,
                    "provisioned user on first login"
                );
                Ok(Provisioned {
                    user,
                    created: true,
                })
            }
            Err(DirectoryError::UniqueViolation { field }) => {
                tracing::debug!(
                    subject_id = %claims.subject_id,
                    %field,
                    "concurrent first login, re-reading record"
                );
                match self.directory.find_by_subject_id(&claims.subject_id).await? {
                    Some(user) => Ok(Provisioned {
                        user,
                        created: false,
                    }),
                    None => Err(ResolveError::Conflict(format!(
                        "{field} is already registered to another account"
                    ))),
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Claims used to build a new record. When the token carries no email the
    /// provider's account profile is consulted.
    async fn provisioning_profile(
        &self,
        claims: &IdentityClaims,
    ) -> Result<IdentityClaims, ResolveError> {
        if claims.email.is_some() {
            return Ok(claims.clone());
        }

        let fetched = tokio::time::timeout(
            self.settings.verify_timeout,
            self.provider.fetch_by_subject_id(&claims.subject_id),
        )
        .await
        .map_err(|_| ResolveError::Transient("identity provider timed out".into()))?
        .map_err(|e| ResolveError::Transient(format!("identity provider: {e}")))?;

        Ok(match fetched {
            Some(profile) => claims.clone().merged_with(profile),
            None => claims.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Bearer abc", Some("abc"))]
    #[case("bearer abc", Some("abc"))]
    #[case("BEARER   abc  ", Some("abc"))]
    #[case("Bearer ", None)]
    #[case("Bearer", None)]
    #[case("Basic dXNlcjpwYXNz", None)]
    #[case("abc", None)]
    #[case("", None)]
    fn bearer_extraction(#[case] header: &str, #[case] expected: Option<&str>) {
        assert_eq!(bearer_credential(header), expected);
    }
}
