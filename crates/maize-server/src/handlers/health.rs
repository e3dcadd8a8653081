use axum::Json;
use serde_json::{Value, json};

/// Liveness probe. Answers without touching the database.
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
