//! `/notifications`: the caller's inbox.

use axum::extract::{Path, State};
use maize_core::entities::Notification;
use maize_core::enums::NotificationKind;
use maize_core::responses::{NotificationStats, SeedStats};
use maize_db::repos::notification::TEST_NOTIFICATION;
use maize_db::repos::{NewNotification, ReadFilter};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ApiError, ApiResult};
use crate::extract::{ApiQuery, CurrentUser};
use crate::response::Reply;
use crate::state::AppState;

const NOT_FOUND: &str = "Notification not found";

#[derive(Debug, Default, Deserialize)]
pub struct InboxQuery {
    pub filter: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct NotificationsPayload {
    pub notifications: Vec<Notification>,
}

#[derive(Debug, Serialize)]
pub struct NotificationPayload {
    pub notification: Notification,
}

#[derive(Debug, Serialize)]
pub struct CountPayload {
    pub count: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifiedPayload {
    pub modified_count: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedPayload {
    pub deleted_count: u64,
}

#[derive(Debug, Serialize)]
pub struct SeededPayload {
    pub notifications: Vec<Notification>,
    pub stats: SeedStats,
}

/// `GET /notifications?filter=read|unread`
pub async fn list(
    State(state): State<AppState>,
    current: CurrentUser,
    ApiQuery(query): ApiQuery<InboxQuery>,
) -> ApiResult<Reply<NotificationsPayload>> {
    let filter = ReadFilter::from_query(query.filter.as_deref());
    let notifications = state.db.list_notifications(current.id(), filter).await?;
    Ok(Reply::ok(NotificationsPayload { notifications }))
}

/// `GET /notifications/unread-count`
pub async fn unread_count(
    State(state): State<AppState>,
    current: CurrentUser,
) -> ApiResult<Reply<CountPayload>> {
    let count = state.db.unread_count(current.id()).await?;
    Ok(Reply::ok(CountPayload { count }))
}

/// `GET /notifications/stats`
pub async fn stats(
    State(state): State<AppState>,
    current: CurrentUser,
) -> ApiResult<Reply<NotificationStats>> {
    let stats = state.db.notification_stats(current.id()).await?;
    Ok(Reply::ok(stats))
}

/// `POST /notifications/{id}/read`
pub async fn mark_read(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Reply<NotificationPayload>> {
    let notification = state
        .db
        .mark_notification_read(current.id(), &id)
        .await?
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))?;
    Ok(Reply::message(
        NotificationPayload { notification },
        "Marked as read",
    ))
}

/// `POST /notifications/read-all`
pub async fn mark_all_read(
    State(state): State<AppState>,
    current: CurrentUser,
) -> ApiResult<Reply<ModifiedPayload>> {
    let modified_count = state.db.mark_all_notifications_read(current.id()).await?;
    Ok(Reply::message(
        ModifiedPayload { modified_count },
        "All notifications marked as read",
    ))
}

/// `POST /notifications/test`
pub async fn create_test(
    State(state): State<AppState>,
    current: CurrentUser,
) -> ApiResult<Reply<NotificationPayload>> {
    let (title, body) = TEST_NOTIFICATION;
    let notification = state
        .db
        .create_notification(NewNotification {
            user_id: current.id().to_string(),
            title: title.to_string(),
            body: body.to_string(),
            kind: NotificationKind::Info,
            is_read: false,
            created_at: None,
        })
        .await?;
    Ok(Reply::created(
        NotificationPayload { notification },
        "Test notification created",
    ))
}

/// `POST /notifications/seed/dummy`
///
/// Replaces the caller's inbox with the sample set.
pub async fn seed_dummy(
    State(state): State<AppState>,
    current: CurrentUser,
) -> ApiResult<Reply<SeededPayload>> {
    let notifications = state.db.seed_dummy_notifications(current.id()).await?;
    let stats = SeedStats::from_notifications(&notifications);
    let message = format!(
        "Successfully seeded {} dummy notifications!",
        notifications.len()
    );
    Ok(Reply::created(
        SeededPayload {
            notifications,
            stats,
        },
        message,
    ))
}

/// `DELETE /notifications/{id}`
pub async fn remove(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Reply<Value>> {
    if !state.db.delete_notification(current.id(), &id).await? {
        return Err(ApiError::not_found(NOT_FOUND));
    }
    Ok(Reply::message(Value::Null, "Notification deleted"))
}

/// `DELETE /notifications/all`
pub async fn remove_all(
    State(state): State<AppState>,
    current: CurrentUser,
) -> ApiResult<Reply<DeletedPayload>> {
    let deleted_count = state.db.delete_all_notifications(current.id()).await?;
    Ok(Reply::message(
        DeletedPayload { deleted_count },
        "All notifications deleted",
    ))
}

/// `DELETE /notifications/clear/all`, development only.
pub async fn clear_all(
    State(state): State<AppState>,
    current: CurrentUser,
) -> ApiResult<Reply<DeletedPayload>> {
    if state.config.general.is_production() {
        return Err(ApiError::production_only());
    }
    let deleted_count = state.db.delete_all_notifications(current.id()).await?;
    Ok(Reply::message(
        DeletedPayload { deleted_count },
        format!("Cleared {deleted_count} notifications"),
    ))
}
