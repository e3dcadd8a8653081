//! `/dashboard`: summary figures and demo seeding.

use axum::extract::State;
use maize_auth::UserIdentity;
use maize_core::responses::{DashboardStats, SeedSummary};

use crate::error::{ApiError, ApiResult};
use crate::extract::CurrentUser;
use crate::response::Reply;
use crate::state::AppState;

/// Greeting name: display name, then email, then a generic fallback.
fn greeting_name(identity: &UserIdentity) -> &str {
    identity
        .display_name()
        .or_else(|| identity.email())
        .unwrap_or("Owner")
}

/// `GET /dashboard`
pub async fn stats(
    State(state): State<AppState>,
    current: CurrentUser,
) -> ApiResult<Reply<DashboardStats>> {
    let stats = state
        .db
        .dashboard_stats(current.id(), greeting_name(&current.0))
        .await?;
    Ok(Reply::ok(stats))
}

/// `POST /dashboard/seed`, development only.
pub async fn seed(
    State(state): State<AppState>,
    current: CurrentUser,
) -> ApiResult<Reply<SeedSummary>> {
    if state.config.general.is_production() {
        return Err(ApiError::production_only());
    }
    let summary = state.db.seed_dashboard(current.id()).await?;
    tracing::info!(owner = current.id(), ?summary, "seeded dashboard data");
    Ok(Reply::message(summary, "Database seeded successfully!"))
}
