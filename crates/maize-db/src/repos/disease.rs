//! Disease detection repository.

use chrono::{DateTime, Utc};
use maize_core::entities::Disease;
use maize_core::enums::Severity;
use maize_core::ids::PREFIX_DISEASE;

use crate::error::DatabaseError;
use crate::helpers::{fmt_datetime, get_count, get_opt_string, now, parse_datetime, parse_enum};
use crate::service::MaizeService;

/// Fields for a new detection record.
#[derive(Debug, Clone)]
pub struct NewDisease {
    pub user_id: String,
    pub plant_id: Option<String>,
    pub name: String,
    pub severity: Severity,
    pub confidence: Option<f64>,
    pub image_path: Option<String>,
    pub detected_at: DateTime<Utc>,
}

const DISEASE_COLUMNS: &str =
    "id, name, severity, detected_at, image_path, confidence, user_id, plant_id, created_at, updated_at";

fn row_to_disease(row: &libsql::Row) -> Result<Disease, DatabaseError> {
    let severity: String = row.get(2)?;
    let detected_at: String = row.get(3)?;
    let created_at: String = row.get(8)?;
    let updated_at: String = row.get(9)?;
    Ok(Disease {
        id: row.get(0)?,
        name: row.get(1)?,
        severity: parse_enum(&severity)?,
        detected_at: parse_datetime(&detected_at)?,
        image_path: get_opt_string(row, 4)?,
        confidence: row.get::<Option<f64>>(5)?,
        user_id: row.get(6)?,
        plant_id: get_opt_string(row, 7)?,
        created_at: parse_datetime(&created_at)?,
        updated_at: parse_datetime(&updated_at)?,
    })
}

impl MaizeService {
    /// # Errors
    ///
    /// Returns `DatabaseError` if the insert fails (including a `plant_id`
    /// that does not exist).
    pub async fn create_disease(&self, new: NewDisease) -> Result<Disease, DatabaseError> {
        let id = self.db().generate_id(PREFIX_DISEASE).await?;
        let now = now();
        self.db()
            .conn()
            .execute(
                "INSERT INTO diseases (id, user_id, plant_id, name, severity, detected_at, image_path, confidence, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)",
                libsql::params![
                    id.as_str(),
                    new.user_id.as_str(),
                    new.plant_id.as_deref(),
                    new.name.as_str(),
                    new.severity.as_str(),
                    fmt_datetime(new.detected_at),
                    new.image_path.as_deref(),
                    new.confidence,
                    fmt_datetime(now),
                ],
            )
            .await?;
        self.find_disease(&new.user_id, &id)
            .await?
            .ok_or(DatabaseError::NoResult)
    }

    /// Most recent detections for a user, newest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_recent_diseases(
        &self,
        user_id: &str,
        limit: u32,
    ) -> Result<Vec<Disease>, DatabaseError> {
        let sql = format!(
            "SELECT {DISEASE_COLUMNS} FROM diseases WHERE user_id = ?1
             ORDER BY detected_at DESC, id LIMIT ?2"
        );
        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params![user_id, i64::from(limit)])
            .await?;
        let mut diseases = Vec::new();
        while let Some(row) = rows.next().await? {
            diseases.push(row_to_disease(&row)?);
        }
        Ok(diseases)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn find_disease(
        &self,
        user_id: &str,
        id: &str,
    ) -> Result<Option<Disease>, DatabaseError> {
        let sql = format!("SELECT {DISEASE_COLUMNS} FROM diseases WHERE id = ?1 AND user_id = ?2");
        let mut rows = self.db().conn().query(&sql, [id, user_id]).await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_disease(&row)?)),
            None => Ok(None),
        }
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn count_diseases(&self, user_id: &str) -> Result<u64, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query("SELECT COUNT(*) FROM diseases WHERE user_id = ?1", [user_id])
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        get_count(&row, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_service;
    use pretty_assertions::assert_eq;

    fn detection(user: &str, name: &str, at: DateTime<Utc>) -> NewDisease {
        NewDisease {
            user_id: user.into(),
            plant_id: None,
            name: name.into(),
            severity: Severity::from_confidence(0.85),
            confidence: Some(0.85),
            image_path: Some("uploads/leaf-1.png".into()),
            detected_at: at,
        }
    }

    #[tokio::test]
    async fn create_roundtrips_fields() {
        let svc = test_service().await;
        let at = now();
        let disease = svc
            .create_disease(detection("u1", "Common Rust", at))
            .await
            .unwrap();
        assert!(disease.id.starts_with("dis-"));
        assert_eq!(disease.severity, Severity::High);
        assert_eq!(disease.confidence, Some(0.85));
        assert_eq!(disease.detected_at, at);
        assert_eq!(svc.count_diseases("u1").await.unwrap(), 1);
        assert!(svc.find_disease("u2", &disease.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn recent_is_newest_first_and_limited() {
        let svc = test_service().await;
        let base = now();
        for i in 0..5 {
            svc.create_disease(detection(
                "u1",
                &format!("d{i}"),
                base + chrono::TimeDelta::minutes(i),
            ))
            .await
            .unwrap();
        }
        svc.create_disease(detection("u2", "other", base)).await.unwrap();

        let recent = svc.list_recent_diseases("u1", 3).await.unwrap();
        let names: Vec<_> = recent.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["d4", "d3", "d2"]);
    }

    #[tokio::test]
    async fn unknown_plant_is_rejected() {
        let svc = test_service().await;
        let mut new = detection("u1", "Gray Leaf Spot", now());
        new.plant_id = Some("plt-missing".into());
        assert!(svc.create_disease(new).await.is_err());
    }

    #[tokio::test]
    async fn deleting_plant_keeps_detection() {
        let svc = test_service().await;
        let plant = svc.create_plant("u1", "Jagung D", None).await.unwrap();
        let mut new = detection("u1", "Leaf Blight", now());
        new.plant_id = Some(plant.id.clone());
        let disease = svc.create_disease(new).await.unwrap();
        assert_eq!(disease.plant_id.as_deref(), Some(plant.id.as_str()));

        svc.delete_plant("u1", &plant.id).await.unwrap();
        let kept = svc.find_disease("u1", &disease.id).await.unwrap().unwrap();
        assert!(kept.plant_id.is_none());
    }
}
