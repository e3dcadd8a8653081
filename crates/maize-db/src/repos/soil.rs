//! Soil reading repository.
//!
//! Humidity is constrained to 0-100 by a CHECK in the schema as well as by
//! the handlers.

use chrono::{DateTime, Utc};
use maize_core::entities::SoilReading;
use maize_core::ids::PREFIX_SOIL_READING;

use crate::error::DatabaseError;
use crate::helpers::{fmt_datetime, get_count, get_opt_string, now, parse_datetime};
use crate::service::MaizeService;
use crate::updates::SoilReadingUpdate;

/// Fields for a new reading. `recorded_at` defaults to now.
#[derive(Debug, Clone, Default)]
pub struct NewSoilReading {
    pub user_id: String,
    pub plant_id: Option<String>,
    pub humidity: f64,
    pub temperature: Option<f64>,
    pub sensor_id: Option<String>,
    pub location: Option<String>,
    pub recorded_at: Option<DateTime<Utc>>,
}

const SOIL_COLUMNS: &str = "id, user_id, plant_id, humidity, temperature, sensor_id, location, \
     recorded_at, created_at, updated_at";

fn row_to_reading(row: &libsql::Row) -> Result<SoilReading, DatabaseError> {
    let recorded_at: String = row.get(7)?;
    let created_at: String = row.get(8)?;
    let updated_at: String = row.get(9)?;
    Ok(SoilReading {
        id: row.get(0)?,
        user_id: row.get(1)?,
        plant_id: get_opt_string(row, 2)?,
        humidity: row.get(3)?,
        temperature: row.get::<Option<f64>>(4)?,
        sensor_id: get_opt_string(row, 5)?,
        location: get_opt_string(row, 6)?,
        recorded_at: parse_datetime(&recorded_at)?,
        created_at: parse_datetime(&created_at)?,
        updated_at: parse_datetime(&updated_at)?,
    })
}

impl MaizeService {
    /// # Errors
    ///
    /// Returns `DatabaseError` if the insert fails.
    pub async fn record_reading(&self, new: NewSoilReading) -> Result<SoilReading, DatabaseError> {
        let id = self.db().generate_id(PREFIX_SOIL_READING).await?;
        let now = now();
        let recorded_at = new.recorded_at.unwrap_or(now);
        self.db()
            .conn()
            .execute(
                "INSERT INTO soil_readings (id, user_id, plant_id, humidity, temperature, sensor_id, location, recorded_at, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)",
                libsql::params![
                    id.as_str(),
                    new.user_id.as_str(),
                    new.plant_id.as_deref(),
                    new.humidity,
                    new.temperature,
                    new.sensor_id.as_deref(),
                    new.location.as_deref(),
                    fmt_datetime(recorded_at),
                    fmt_datetime(now),
                ],
            )
            .await?;
        self.find_reading(&new.user_id, &id)
            .await?
            .ok_or(DatabaseError::NoResult)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn find_reading(
        &self,
        user_id: &str,
        id: &str,
    ) -> Result<Option<SoilReading>, DatabaseError> {
        let sql = format!("SELECT {SOIL_COLUMNS} FROM soil_readings WHERE id = ?1 AND user_id = ?2");
        let mut rows = self.db().conn().query(&sql, [id, user_id]).await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_reading(&row)?)),
            None => Ok(None),
        }
    }

    /// Most recent reading for a user.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn latest_reading(&self, user_id: &str) -> Result<Option<SoilReading>, DatabaseError> {
        let sql = format!(
            "SELECT {SOIL_COLUMNS} FROM soil_readings WHERE user_id = ?1
             ORDER BY recorded_at DESC, created_at DESC LIMIT 1"
        );
        let mut rows = self.db().conn().query(&sql, [user_id]).await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_reading(&row)?)),
            None => Ok(None),
        }
    }

    /// One page of readings, newest first, plus the total count.
    ///
    /// `page` is 1-based; values below 1 are treated as 1.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_readings(
        &self,
        user_id: &str,
        page: u32,
        limit: u32,
    ) -> Result<(Vec<SoilReading>, u64), DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query("SELECT COUNT(*) FROM soil_readings WHERE user_id = ?1", [user_id])
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        let total = get_count(&row, 0)?;

        let offset = i64::from(page.max(1) - 1) * i64::from(limit);
        let sql = format!(
            "SELECT {SOIL_COLUMNS} FROM soil_readings WHERE user_id = ?1
             ORDER BY recorded_at DESC, created_at DESC LIMIT ?2 OFFSET ?3"
        );
        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params![user_id, i64::from(limit), offset])
            .await?;
        let mut readings = Vec::new();
        while let Some(row) = rows.next().await? {
            readings.push(row_to_reading(&row)?);
        }
        Ok((readings, total))
    }

    /// Readings for one plant recorded at or after `since`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn readings_for_plant(
        &self,
        user_id: &str,
        plant_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<SoilReading>, DatabaseError> {
        let sql = format!(
            "SELECT {SOIL_COLUMNS} FROM soil_readings
             WHERE user_id = ?1 AND plant_id = ?2 AND recorded_at >= ?3
             ORDER BY recorded_at ASC"
        );
        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params![user_id, plant_id, fmt_datetime(since)])
            .await?;
        let mut readings = Vec::new();
        while let Some(row) = rows.next().await? {
            readings.push(row_to_reading(&row)?);
        }
        Ok(readings)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the update fails.
    pub async fn update_reading(
        &self,
        user_id: &str,
        id: &str,
        update: &SoilReadingUpdate,
    ) -> Result<Option<SoilReading>, DatabaseError> {
        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        let mut idx = 1;

        if let Some(humidity) = update.humidity {
            sets.push(format!("humidity = ?{idx}"));
            params.push(humidity.into());
            idx += 1;
        }
        if let Some(temperature) = update.temperature {
            sets.push(format!("temperature = ?{idx}"));
            params.push(temperature.into());
            idx += 1;
        }
        if let Some(ref location) = update.location {
            sets.push(format!("location = ?{idx}"));
            params.push(location.as_str().into());
            idx += 1;
        }

        sets.push(format!("updated_at = ?{idx}"));
        params.push(fmt_datetime(now()).into());
        idx += 1;

        params.push(id.into());
        params.push(user_id.into());
        let sql = format!(
            "UPDATE soil_readings SET {} WHERE id = ?{idx} AND user_id = ?{}",
            sets.join(", "),
            idx + 1
        );
        let changed = self
            .db()
            .conn()
            .execute(&sql, libsql::params_from_iter(params))
            .await?;
        if changed == 0 {
            return Ok(None);
        }
        self.find_reading(user_id, id).await
    }

    /// Returns `true` if a reading was deleted.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the delete fails.
    pub async fn delete_reading(&self, user_id: &str, id: &str) -> Result<bool, DatabaseError> {
        let changed = self
            .db()
            .conn()
            .execute(
                "DELETE FROM soil_readings WHERE id = ?1 AND user_id = ?2",
                [id, user_id],
            )
            .await?;
        Ok(changed > 0)
    }
}
