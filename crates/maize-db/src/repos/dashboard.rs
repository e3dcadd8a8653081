//! Dashboard aggregates and the demo-data seeder.

use chrono::TimeDelta;
use maize_core::enums::Severity;
use maize_core::ids::{PREFIX_DISEASE, PREFIX_PLANT, PREFIX_SOIL_READING};
use maize_core::responses::{DashboardStats, SeedSummary};

use crate::error::DatabaseError;
use crate::helpers::{fmt_datetime, now};
use crate::service::MaizeService;

/// Plants installed by [`MaizeService::seed_dashboard`]: name and field block.
const SEED_PLANTS: &[(&str, &str)] = &[
    ("Jagung A", "Blok 1"),
    ("Jagung B", "Blok 1"),
    ("Jagung C", "Blok 2"),
    ("Jagung D", "Blok 2"),
    ("Jagung E", "Blok 3"),
];

/// Index into [`SEED_PLANTS`] of the plant given a detection.
const SEED_SICK_PLANT: usize = 3;

const SEED_READING_DAYS: i64 = 7;

impl MaizeService {
    /// Owner-scoped dashboard summary.
    ///
    /// Each detection counts as one sick plant; healthy plants are the
    /// remainder, floored at zero.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if any aggregate query fails.
    pub async fn dashboard_stats(
        &self,
        owner_id: &str,
        user_name: &str,
    ) -> Result<DashboardStats, DatabaseError> {
        let total_plants = self.count_plants(owner_id).await?;
        let diseases = self.count_diseases(owner_id).await?;
        let latest = self.latest_reading(owner_id).await?;

        Ok(DashboardStats {
            user_name: user_name.to_string(),
            total_plants,
            healthy_plants: total_plants.saturating_sub(diseases),
            sick_plants: diseases,
            humidity: latest.as_ref().map_or(0.0, |r| r.humidity),
            plants: total_plants,
            diseases,
            latest_humidity: latest,
        })
    }

    /// Replace the owner's plants, detections, and soil readings with demo
    /// data: five plants, one detection, and one reading per day for the past
    /// week with humidity between 60 and 79.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if any statement fails; nothing is changed in
    /// that case.
    pub async fn seed_dashboard(&self, owner_id: &str) -> Result<SeedSummary, DatabaseError> {
        let base = now();
        let stamp = fmt_datetime(base);
        let tx = self.db().conn().transaction().await?;

        for table in ["soil_readings", "diseases"] {
            tx.execute(&format!("DELETE FROM {table} WHERE user_id = ?1"), [owner_id])
                .await?;
        }
        tx.execute("DELETE FROM plants WHERE owner_id = ?1", [owner_id])
            .await?;

        let mut plant_ids = Vec::with_capacity(SEED_PLANTS.len());
        for (offset, (name, location)) in (0_i64..).zip(SEED_PLANTS) {
            let id = self.db().generate_id(PREFIX_PLANT).await?;
            let created_at = fmt_datetime(base - TimeDelta::days(SEED_READING_DAYS - offset));
            tx.execute(
                "INSERT INTO plants (id, owner_id, name, location, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
                libsql::params![id.as_str(), owner_id, *name, *location, created_at],
            )
            .await?;
            plant_ids.push(id);
        }

        let disease_id = self.db().generate_id(PREFIX_DISEASE).await?;
        tx.execute(
            "INSERT INTO diseases (id, user_id, plant_id, name, severity, detected_at, created_at, updated_at)
             VALUES (?1, ?2, ?3, 'Leaf Blight', ?4, ?5, ?5, ?5)",
            libsql::params![
                disease_id.as_str(),
                owner_id,
                plant_ids.get(SEED_SICK_PLANT).map(String::as_str),
                Severity::Medium.as_str(),
                stamp.as_str(),
            ],
        )
        .await?;

        for day in 0..SEED_READING_DAYS {
            let id = self.db().generate_id(PREFIX_SOIL_READING).await?;
            let recorded_at = fmt_datetime(base - TimeDelta::days(day));
            tx.execute(
                "INSERT INTO soil_readings (id, user_id, humidity, recorded_at, created_at, updated_at)
                 VALUES (?1, ?2, 60 + abs(random() % 20), ?3, ?4, ?4)",
                libsql::params![id.as_str(), owner_id, recorded_at, stamp.as_str()],
            )
            .await?;
        }

        tx.commit().await?;

        let summary = SeedSummary {
            plants: plant_ids.len() as u64,
            diseases: 1,
            humidity: SEED_READING_DAYS.unsigned_abs(),
        };
        tracing::info!(owner_id, ?summary, "seeded dashboard data");
        Ok(summary)
    }
}
