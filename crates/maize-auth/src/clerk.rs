//! Clerk-backed [`IdentityProvider`].
//!
//! Session tokens are validated against Clerk's JWKS via `clerk-rs`; the
//! account endpoints it doesn't expose (user lookup, user creation, sign-in
//! tokens) are called on the Backend API directly with `reqwest`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use clerk_rs::ClerkConfiguration;
use clerk_rs::clerk::Clerk;
use clerk_rs::validators::authorizer::{ClerkError, validate_jwt};
use clerk_rs::validators::jwks::MemoryCacheJwksProvider;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::claims::IdentityClaims;
use crate::error::ProviderError;
use crate::provider::{IdentityProvider, NewAccount};

/// Clerk provider. Owns its JWKS cache (keys are cached for an hour by
/// `MemoryCacheJwksProvider`) and a pooled HTTP client.
pub struct ClerkProvider {
    jwks: Arc<MemoryCacheJwksProvider>,
    http: reqwest::Client,
    api_url: String,
    secret_key: String,
}

impl ClerkProvider {
    /// # Errors
    ///
    /// Returns `ProviderError::Unavailable` if the HTTP client cannot be built.
    pub fn new(secret_key: &str, api_url: &str, timeout: Duration) -> Result<Self, ProviderError> {
        let config = ClerkConfiguration::new(None, None, Some(secret_key.to_string()), None);
        let jwks = Arc::new(MemoryCacheJwksProvider::new(Clerk::new(config)));
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Unavailable(format!("http client: {e}")))?;
        Ok(Self {
            jwks,
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            secret_key: secret_key.to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        op: &str,
    ) -> Result<reqwest::Response, ProviderError> {
        request
            .bearer_auth(&self.secret_key)
            .send()
            .await
            .map_err(|e| ProviderError::Unavailable(format!("{op}: {e}")))
    }
}

impl std::fmt::Debug for ClerkProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClerkProvider")
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl IdentityProvider for ClerkProvider {
    async fn verify(&self, credential: &str) -> Result<IdentityClaims, ProviderError> {
        let jwt = validate_jwt(credential, Arc::clone(&self.jwks))
            .await
            .map_err(|e| match e {
                ClerkError::Unauthorized(msg) => ProviderError::Rejected(msg),
                ClerkError::InternalServerError(msg) => ProviderError::Unavailable(msg),
            })?;
        Ok(claims_from_token(jwt.sub, jwt.other))
    }

    async fn fetch_by_subject_id(
        &self,
        subject_id: &str,
    ) -> Result<Option<IdentityClaims>, ProviderError> {
        let url = self.endpoint(&format!("users/{subject_id}"));
        let resp = self.send(self.http.get(&url), "fetch user").await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let user: ClerkUser = parse_json(resp, "fetch user").await?;
        Ok(Some(user.into_claims()))
    }

    async fn create_account(&self, account: &NewAccount) -> Result<IdentityClaims, ProviderError> {
        let (first_name, last_name) = split_name(&account.name);
        let body = serde_json::json!({
            "email_address": [account.email],
            "password": account.password,
            "first_name": first_name,
            "last_name": last_name,
        });
        let url = self.endpoint("users");
        let resp = self.send(self.http.post(&url).json(&body), "create user").await?;
        let user: ClerkUser = parse_json(resp, "create user").await?;
        tracing::info!(subject_id = %user.id, "created clerk account");
        Ok(user.into_claims())
    }

    async fn issue_sign_in_token(&self, subject_id: &str) -> Result<String, ProviderError> {
        #[derive(Deserialize)]
        struct SignInToken {
            token: String,
        }

        let url = self.endpoint("sign_in_tokens");
        let body = serde_json::json!({ "user_id": subject_id });
        let resp = self
            .send(self.http.post(&url).json(&body), "sign-in token")
            .await?;
        let token: SignInToken = parse_json(resp, "sign-in token").await?;
        Ok(token.token)
    }
}

/// Map a non-success Backend API status to a provider error. Client errors
/// are rejections; everything else means Clerk could not serve the request.
fn status_error(status: StatusCode, op: &str, body: &str) -> ProviderError {
    let detail = clerk_error_message(body).unwrap_or_else(|| body.to_string());
    if status.is_client_error() && status != StatusCode::TOO_MANY_REQUESTS {
        ProviderError::Rejected(format!("{op}: {detail}"))
    } else {
        ProviderError::Unavailable(format!("{op}: HTTP {status}: {detail}"))
    }
}

async fn parse_json<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
    op: &str,
) -> Result<T, ProviderError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(status_error(status, op, &body));
    }
    resp.json()
        .await
        .map_err(|e| ProviderError::Unavailable(format!("parse {op}: {e}")))
}

/// First human-readable message from a Clerk error body
/// (`{"errors":[{"message":..,"long_message":..}]}`).
fn clerk_error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let first = value.get("errors")?.as_array()?.first()?;
    first
        .get("long_message")
        .or_else(|| first.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn split_name(name: &str) -> (&str, Option<&str>) {
    match name.trim().split_once(' ') {
        Some((first, last)) if !last.trim().is_empty() => (first, Some(last.trim())),
        _ => (name.trim(), None),
    }
}

fn string_claim(claims: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|k| claims.get(*k).and_then(Value::as_str))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Build claims from a validated session token. Clerk only includes profile
/// fields when the session template adds them, so every one is optional.
fn claims_from_token(subject_id: String, other: Map<String, Value>) -> IdentityClaims {
    IdentityClaims {
        email: string_claim(&other, &["email", "email_address", "primary_email"]),
        display_name: string_claim(&other, &["name", "full_name"]),
        photo_url: string_claim(&other, &["picture", "image_url"]),
        subject_id,
        extra: other,
    }
}

#[derive(Debug, Deserialize)]
struct ClerkEmail {
    id: String,
    email_address: String,
}

#[derive(Debug, Deserialize)]
struct ClerkUser {
    id: String,
    first_name: Option<String>,
    last_name: Option<String>,
    image_url: Option<String>,
    primary_email_address_id: Option<String>,
    #[serde(default)]
    email_addresses: Vec<ClerkEmail>,
}

impl ClerkUser {
    fn into_claims(self) -> IdentityClaims {
        let email = self
            .email_addresses
            .iter()
            .find(|e| Some(&e.id) == self.primary_email_address_id.as_ref())
            .or_else(|| self.email_addresses.first())
            .map(|e| e.email_address.clone());
        let name = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        IdentityClaims {
            subject_id: self.id,
            email,
            display_name: (!name.is_empty()).then_some(name),
            photo_url: self.image_url,
            extra: Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn clerk_user_prefers_primary_email() {
        let user: ClerkUser = serde_json::from_value(serde_json::json!({
            "id": "user_2abc",
            "first_name": "Siti",
            "last_name": "Aminah",
            "image_url": "https://img.clerk.com/x",
            "primary_email_address_id": "idn_2",
            "email_addresses": [
                { "id": "idn_1", "email_address": "old@x.com" },
                { "id": "idn_2", "email_address": "siti@x.com" }
            ]
        }))
        .unwrap();

        let claims = user.into_claims();
        assert_eq!(claims.subject_id, "user_2abc");
        assert_eq!(claims.email.as_deref(), Some("siti@x.com"));
        assert_eq!(claims.display_name.as_deref(), Some("Siti Aminah"));
        assert_eq!(claims.photo_url.as_deref(), Some("https://img.clerk.com/x"));
    }

    #[test]
    fn clerk_user_without_names_has_no_display_name() {
        let user: ClerkUser = serde_json::from_value(serde_json::json!({
            "id": "user_2abc",
            "first_name": null,
            "last_name": "",
            "image_url": null,
            "primary_email_address_id": null,
            "email_addresses": []
        }))
        .unwrap();

        let claims = user.into_claims();
        assert!(claims.email.is_none());
        assert!(claims.display_name.is_none());
    }

    #[test]
    fn token_claims_are_extracted_and_passed_through() {
        let other = serde_json::json!({
            "email": "a@x.com",
            "full_name": " Budi ",
            "metadata": { "farm": "Blok 1" }
        });
        let Value::Object(other) = other else {
            unreachable!()
        };
        let claims = claims_from_token("abc123".into(), other);
        assert_eq!(claims.email.as_deref(), Some("a@x.com"));
        assert_eq!(claims.display_name.as_deref(), Some("Budi"));
        assert!(claims.extra.contains_key("metadata"));
    }

    #[test]
    fn client_errors_are_rejections() {
        let body = r#"{"errors":[{"message":"taken","long_message":"That email address is taken."}]}"#;
        let err = status_error(StatusCode::UNPROCESSABLE_ENTITY, "create user", body);
        assert!(
            matches!(err, ProviderError::Rejected(ref m) if m.contains("That email address is taken."))
        );
    }

    #[test]
    fn server_errors_and_throttling_are_unavailable() {
        assert!(matches!(
            status_error(StatusCode::BAD_GATEWAY, "fetch user", ""),
            ProviderError::Unavailable(_)
        ));
        assert!(matches!(
            status_error(StatusCode::TOO_MANY_REQUESTS, "fetch user", ""),
            ProviderError::Unavailable(_)
        ));
    }

    #[test]
    fn names_split_on_first_space() {
        assert_eq!(split_name("Siti Nur Aminah"), ("Siti", Some("Nur Aminah")));
        assert_eq!(split_name("Budi"), ("Budi", None));
    }

    #[test]
    fn endpoint_joins_without_double_slash() {
        let provider = ClerkProvider::new(
            "sk_test_x",
            "https://api.clerk.com/v1/",
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(
            provider.endpoint("/users/u1"),
            "https://api.clerk.com/v1/users/u1"
        );
    }
}
