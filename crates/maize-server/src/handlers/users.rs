//! `/users/{id}`: read any profile, edit only your own.

use axum::extract::{Path, State};
use maize_db::updates::UserUpdate;

use super::auth::UserPayload;
use crate::error::{ApiError, ApiResult};
use crate::extract::{ApiJson, CurrentUser};
use crate::response::Reply;
use crate::state::AppState;

pub async fn get_user(
    State(state): State<AppState>,
    _current: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Reply<UserPayload>> {
    let user = state
        .db
        .find_user(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(Reply::ok(UserPayload { user }))
}

pub async fn update_user(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<String>,
    ApiJson(update): ApiJson<UserUpdate>,
) -> ApiResult<Reply<UserPayload>> {
    if id != current.id() {
        return Err(ApiError::Forbidden(
            "You can only update your own profile".into(),
        ));
    }
    let user = state
        .db
        .update_user(&id, &update)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(Reply::message(UserPayload { user }, "Profile updated"))
}
