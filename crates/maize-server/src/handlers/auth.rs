//! `/auth`: registration, login, and the caller's own profile.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use maize_auth::{NewAccount, bearer_credential};
use maize_core::entities::{NewUser, User};
use maize_db::error::DatabaseError;
use maize_db::updates::UserUpdate;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::extract::{ApiJson, CurrentUser};
use crate::response::Reply;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    pub id_token: Option<String>,
}

/// Only these profile fields are editable through `/auth/profile`.
#[derive(Debug, Default, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "photoURL")]
    pub photo_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UserPayload {
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct RegisteredPayload {
    pub user: User,
    pub token: String,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// `POST /auth/register`
///
/// Creates the provider account first, then the local record, then mints a
/// sign-in token for the client to exchange.
pub async fn register(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RegisterRequest>,
) -> ApiResult<Reply<RegisteredPayload>> {
    let (Some(email), Some(password), Some(name)) = (
        non_blank(body.email),
        body.password.filter(|p| !p.is_empty()),
        non_blank(body.name),
    ) else {
        return Err(ApiError::bad_request("Email, password, and name are required"));
    };

    if state.db.find_user_by_email(&email).await?.is_some() {
        return Err(ApiError::bad_request("Email already registered"));
    }

    let provider = state.resolver.provider();
    let account = NewAccount {
        email: email.clone(),
        password,
        name: name.clone(),
    };
    let claims = provider.create_account(&account).await?;

    let user = match state
        .db
        .create_user(NewUser {
            subject_id: Some(claims.subject_id.clone()),
            name,
            email: Some(email),
            photo_url: claims.photo_url.clone(),
        })
        .await
    {
        Ok(user) => user,
        Err(DatabaseError::UniqueViolation { field }) => {
            tracing::warn!(
                subject_id = %claims.subject_id,
                field = %field,
                "provider account created without a local record"
            );
            return Err(ApiError::bad_request("Email already registered"));
        }
        Err(e) => return Err(e.into()),
    };

    let token = provider.issue_sign_in_token(&claims.subject_id).await?;
    tracing::info!(user_id = %user.id, "registered user");
    Ok(Reply::created(
        RegisteredPayload { user, token },
        "User registered successfully",
    ))
}

/// `POST /auth/login`
///
/// Accepts the credential as `{ "idToken": ... }` or as a bearer header. The
/// record is provisioned on first login exactly as the identity middleware
/// would, then stamped with the login time.
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Reply<UserPayload>> {
    let from_body = if body.is_empty() {
        None
    } else {
        let req: LoginRequest = serde_json::from_slice(&body)
            .map_err(|e| ApiError::bad_request(format!("Invalid JSON body: {e}")))?;
        non_blank(req.id_token)
    };
    let from_header = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(bearer_credential)
        .map(str::to_string);
    let Some(token) = from_body.or(from_header) else {
        return Err(ApiError::bad_request("ID token required"));
    };

    let claims = state.resolver.verify_credential(&token).await?;
    let provisioned = state.resolver.provision(&claims).await?;
    let user = state.db.touch_last_login(&provisioned.user.id).await?;
    tracing::info!(user_id = %user.id, created = provisioned.created, "user logged in");
    Ok(Reply::message(UserPayload { user }, "Logged in successfully"))
}

/// `GET /auth/profile`
pub async fn profile(
    State(state): State<AppState>,
    current: CurrentUser,
) -> ApiResult<Reply<UserPayload>> {
    let user = state
        .db
        .find_user(current.id())
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(Reply::message(UserPayload { user }, "Profile retrieved"))
}

/// `PUT /auth/profile`
pub async fn update_profile(
    State(state): State<AppState>,
    current: CurrentUser,
    ApiJson(body): ApiJson<ProfileUpdate>,
) -> ApiResult<Reply<UserPayload>> {
    let update = UserUpdate {
        name: body.name,
        photo_url: body.photo_url,
        ..UserUpdate::default()
    };
    let user = state
        .db
        .update_user(current.id(), &update)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(Reply::message(UserPayload { user }, "Profile updated"))
}
