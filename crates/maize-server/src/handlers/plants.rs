//! `/plants`: owner-scoped plant CRUD.

use axum::extract::{Path, State};
use maize_core::entities::Plant;
use maize_db::updates::PlantUpdate;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::{ApiError, ApiResult};
use crate::extract::{ApiJson, CurrentUser};
use crate::response::Reply;
use crate::state::AppState;

const NOT_FOUND: &str = "Plant not found";

#[derive(Debug, Deserialize)]
pub struct CreatePlant {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PlantPayload {
    pub plant: Plant,
}

#[derive(Debug, Serialize)]
pub struct PlantsPayload {
    pub plants: Vec<Plant>,
}

pub async fn create(
    State(state): State<AppState>,
    current: CurrentUser,
    ApiJson(body): ApiJson<CreatePlant>,
) -> ApiResult<Reply<PlantPayload>> {
    let name = body
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| ApiError::bad_request("Plant name is required"))?;
    let plant = state
        .db
        .create_plant(current.id(), name, body.location.as_deref())
        .await?;
    Ok(Reply::created(PlantPayload { plant }, "Plant created"))
}

pub async fn list(
    State(state): State<AppState>,
    current: CurrentUser,
) -> ApiResult<Reply<PlantsPayload>> {
    let plants = state.db.list_plants(current.id()).await?;
    Ok(Reply::ok(PlantsPayload { plants }))
}

pub async fn get(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Reply<PlantPayload>> {
    let plant = state
        .db
        .find_plant(current.id(), &id)
        .await?
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))?;
    Ok(Reply::ok(PlantPayload { plant }))
}

pub async fn update(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<String>,
    ApiJson(update): ApiJson<PlantUpdate>,
) -> ApiResult<Reply<PlantPayload>> {
    if update.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(ApiError::bad_request("Plant name cannot be empty"));
    }
    let plant = state
        .db
        .update_plant(current.id(), &id, &update)
        .await?
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))?;
    Ok(Reply::message(PlantPayload { plant }, "Updated"))
}

pub async fn remove(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Reply<Value>> {
    if !state.db.delete_plant(current.id(), &id).await? {
        return Err(ApiError::not_found(NOT_FOUND));
    }
    Ok(Reply::message(json!({}), "Deleted"))
}
