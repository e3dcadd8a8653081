//! Router assembly.

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method};
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{delete, get, post, put};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    auth, dashboard, diseases, health, notifications, plants, soil, users,
};
use crate::middleware;
use crate::state::AppState;

/// Room for multipart boundaries and headers on top of the image itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Build the full application router.
///
/// Layout:
/// - `GET /health` and `/uploads/*` at the root
/// - everything else under `/api/{api_version}`; `auth/register` and
///   `auth/login` are public, the rest require an identity
pub fn build_router(state: AppState) -> Router {
    let prefix = state.config.server.api_prefix();
    let upload_dir = state.config.uploads.dir.clone();

    let public = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login));

    let protected = Router::new()
        .route("/auth/profile", get(auth::profile).put(auth::update_profile))
        .nest("/users", user_routes())
        .nest("/plants", plant_routes())
        .nest("/diseases", disease_routes(&state))
        .nest("/soil-sensors", soil_routes())
        .nest("/notifications", notification_routes())
        .nest("/dashboard", dashboard_routes())
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware::require_identity,
        ));

    Router::new()
        .nest(&prefix, public.merge(protected))
        .route("/health", get(health::health))
        .nest_service("/uploads", ServeDir::new(upload_dir))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state))
        .layer(from_fn(middleware::request_id))
        .with_state(state)
}

fn user_routes() -> Router<AppState> {
    Router::new().route("/{id}", get(users::get_user).put(users::update_user))
}

fn plant_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(plants::create).get(plants::list))
        .route(
            "/{id}",
            get(plants::get).put(plants::update).delete(plants::remove),
        )
}

fn disease_routes(state: &AppState) -> Router<AppState> {
    let limit = state
        .config
        .uploads
        .max_bytes
        .saturating_add(MULTIPART_OVERHEAD);
    Router::new()
        .route(
            "/predict",
            post(diseases::predict).layer(DefaultBodyLimit::max(limit)),
        )
        .route("/", get(diseases::list))
        .route("/{id}", get(diseases::detail))
}

fn soil_routes() -> Router<AppState> {
    Router::new()
        .route("/latest", get(soil::latest))
        .route("/", get(soil::list).post(soil::record))
        .route("/plant/{plant_id}", get(soil::for_plant))
        .route("/{id}", put(soil::update).delete(soil::remove))
}

fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(notifications::list))
        .route("/unread-count", get(notifications::unread_count))
        .route("/stats", get(notifications::stats))
        .route("/read-all", post(notifications::mark_all_read))
        .route("/test", post(notifications::create_test))
        .route("/seed/dummy", post(notifications::seed_dummy))
        .route("/all", delete(notifications::remove_all))
        .route("/clear/all", delete(notifications::clear_all))
        .route("/{id}/read", post(notifications::mark_read))
        .route("/{id}", delete(notifications::remove))
}

fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::stats))
        .route("/seed", post(dashboard::seed))
}

/// Any origin, the methods the mobile client uses, and the identity headers.
fn cors_layer(state: &AppState) -> CorsLayer {
    let mut allowed = vec![CONTENT_TYPE, AUTHORIZATION];
    if let Ok(dev_header) = HeaderName::from_bytes(state.config.auth.dev_header.as_bytes()) {
        allowed.push(dev_header);
    }
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(allowed)
        .expose_headers([AUTHORIZATION])
}
