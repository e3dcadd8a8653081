//! `/soil-sensors`: humidity readings.

use axum::extract::{Path, State};
use chrono::{Duration, Utc};
use maize_core::entities::SoilReading;
use maize_core::responses::{Pagination, SoilReadingPage};
use maize_db::repos::NewSoilReading;
use maize_db::updates::SoilReadingUpdate;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{ApiError, ApiResult};
use crate::extract::{ApiJson, ApiQuery, CurrentUser};
use crate::response::Reply;
use crate::state::AppState;

const NOT_FOUND: &str = "Sensor data tidak ditemukan";
const OUT_OF_RANGE: &str = "Kelembaban harus antara 0-100";

const DEFAULT_PAGE: u32 = 1;
const DEFAULT_LIMIT: u32 = 10;
const MAX_LIMIT: u32 = 100;
const DEFAULT_DAYS: u32 = 7;
const MAX_DAYS: u32 = 3_650;

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl PageQuery {
    /// Page and limit with defaults applied; `limit` is clamped to 1..=100.
    #[must_use]
    pub fn resolve(&self) -> (u32, u32) {
        let page = self.page.unwrap_or(DEFAULT_PAGE).max(1);
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        (page, limit)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct WindowQuery {
    pub days: Option<u32>,
}

impl WindowQuery {
    /// Window length in days, defaulting to a week and capped at ten years.
    #[must_use]
    pub fn resolve(&self) -> u32 {
        self.days.unwrap_or(DEFAULT_DAYS).min(MAX_DAYS)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordReading {
    pub plant_id: Option<String>,
    pub humidity: Option<f64>,
    pub temperature: Option<f64>,
    pub sensor_id: Option<String>,
    pub location: Option<String>,
}

/// `GET /soil-sensors/latest`
pub async fn latest(
    State(state): State<AppState>,
    current: CurrentUser,
) -> ApiResult<Reply<SoilReading>> {
    let reading = state
        .db
        .latest_reading(current.id())
        .await?
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))?;
    Ok(Reply::message(reading, "Sensor data berhasil diambil"))
}

/// `GET /soil-sensors?page=&limit=`
pub async fn list(
    State(state): State<AppState>,
    current: CurrentUser,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> ApiResult<Reply<SoilReadingPage>> {
    let (page, limit) = query.resolve();
    let (data, total) = state.db.list_readings(current.id(), page, limit).await?;
    Ok(Reply::message(
        SoilReadingPage {
            data,
            pagination: Pagination::new(total, page, limit),
        },
        "Data sensor berhasil diambil",
    ))
}

/// `GET /soil-sensors/plant/{plant_id}?days=`
pub async fn for_plant(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(plant_id): Path<String>,
    ApiQuery(query): ApiQuery<WindowQuery>,
) -> ApiResult<Reply<Vec<SoilReading>>> {
    let since = Utc::now() - Duration::days(i64::from(query.resolve()));
    let readings = state
        .db
        .readings_for_plant(current.id(), &plant_id, since)
        .await?;
    Ok(Reply::message(
        readings,
        "Data sensor untuk plant berhasil diambil",
    ))
}

/// `POST /soil-sensors`
pub async fn record(
    State(state): State<AppState>,
    current: CurrentUser,
    ApiJson(body): ApiJson<RecordReading>,
) -> ApiResult<Reply<SoilReading>> {
    let humidity = body
        .humidity
        .filter(|h| SoilReading::humidity_in_range(*h))
        .ok_or_else(|| ApiError::bad_request(OUT_OF_RANGE))?;

    if let Some(ref plant_id) = body.plant_id {
        if state.db.find_plant(current.id(), plant_id).await?.is_none() {
            return Err(ApiError::not_found("Plant not found"));
        }
    }

    let reading = state
        .db
        .record_reading(NewSoilReading {
            user_id: current.id().to_string(),
            plant_id: body.plant_id,
            humidity,
            temperature: body.temperature,
            sensor_id: body.sensor_id,
            location: body.location,
            recorded_at: None,
        })
        .await?;
    Ok(Reply::created(reading, "Data sensor berhasil disimpan"))
}

/// `PUT /soil-sensors/{id}`
pub async fn update(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<String>,
    ApiJson(update): ApiJson<SoilReadingUpdate>,
) -> ApiResult<Reply<SoilReading>> {
    if update.humidity.is_some_and(|h| !SoilReading::humidity_in_range(h)) {
        return Err(ApiError::bad_request(OUT_OF_RANGE));
    }
    let reading = state
        .db
        .update_reading(current.id(), &id, &update)
        .await?
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))?;
    Ok(Reply::message(reading, "Data sensor berhasil diperbarui"))
}

/// `DELETE /soil-sensors/{id}`
pub async fn remove(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Reply<Value>> {
    if !state.db.delete_reading(current.id(), &id).await? {
        return Err(ApiError::not_found(NOT_FOUND));
    }
    Ok(Reply::message(Value::Null, "Data sensor berhasil dihapus"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, None, (1, 10))]
    #[case(Some(3), Some(25), (3, 25))]
    #[case(Some(0), Some(0), (1, 1))]
    #[case(Some(2), Some(1_000), (2, 100))]
    fn page_query_defaults_and_bounds(
        #[case] page: Option<u32>,
        #[case] limit: Option<u32>,
        #[case] expected: (u32, u32),
    ) {
        assert_eq!(PageQuery { page, limit }.resolve(), expected);
    }

    #[rstest]
    #[case(None, 7)]
    #[case(Some(30), 30)]
    #[case(Some(u32::MAX), 3_650)]
    fn window_query_is_capped(#[case] days: Option<u32>, #[case] expected: u32) {
        assert_eq!(WindowQuery { days }.resolve(), expected);
    }
}
