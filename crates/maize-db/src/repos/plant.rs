//! Plant repository. Every query is scoped to the owner id.

use maize_core::entities::Plant;
use maize_core::ids::PREFIX_PLANT;

use crate::error::DatabaseError;
use crate::helpers::{fmt_datetime, get_count, get_opt_string, now, parse_datetime};
use crate::service::MaizeService;
use crate::updates::PlantUpdate;

fn row_to_plant(row: &libsql::Row) -> Result<Plant, DatabaseError> {
    let created_at: String = row.get(4)?;
    Ok(Plant {
        id: row.get(0)?,
        name: row.get(1)?,
        location: get_opt_string(row, 2)?,
        owner_id: row.get(3)?,
        created_at: parse_datetime(&created_at)?,
    })
}

impl MaizeService {
    /// # Errors
    ///
    /// Returns `DatabaseError` if the insert fails.
    pub async fn create_plant(
        &self,
        owner_id: &str,
        name: &str,
        location: Option<&str>,
    ) -> Result<Plant, DatabaseError> {
        let id = self.db().generate_id(PREFIX_PLANT).await?;
        let now = now();
        self.db()
            .conn()
            .execute(
                "INSERT INTO plants (id, owner_id, name, location, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
                libsql::params![id.as_str(), owner_id, name, location, fmt_datetime(now)],
            )
            .await?;
        Ok(Plant {
            id,
            name: name.to_string(),
            location: location.map(str::to_string),
            owner_id: owner_id.to_string(),
            created_at: now,
        })
    }

    /// Plants owned by `owner_id`, newest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_plants(&self, owner_id: &str) -> Result<Vec<Plant>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT id, name, location, owner_id, created_at FROM plants
                 WHERE owner_id = ?1 ORDER BY created_at DESC, id",
                [owner_id],
            )
            .await?;
        let mut plants = Vec::new();
        while let Some(row) = rows.next().await? {
            plants.push(row_to_plant(&row)?);
        }
        Ok(plants)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn find_plant(&self, owner_id: &str, id: &str) -> Result<Option<Plant>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT id, name, location, owner_id, created_at FROM plants
                 WHERE id = ?1 AND owner_id = ?2",
                [id, owner_id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_plant(&row)?)),
            None => Ok(None),
        }
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the update fails.
    pub async fn update_plant(
        &self,
        owner_id: &str,
        id: &str,
        update: &PlantUpdate,
    ) -> Result<Option<Plant>, DatabaseError> {
        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        let mut idx = 1;

        if let Some(ref name) = update.name {
            sets.push(format!("name = ?{idx}"));
            params.push(name.as_str().into());
            idx += 1;
        }
        if let Some(ref location) = update.location {
            sets.push(format!("location = ?{idx}"));
            params.push(location.as_str().into());
            idx += 1;
        }

        if sets.is_empty() {
            return self.find_plant(owner_id, id).await;
        }

        params.push(id.into());
        params.push(owner_id.into());
        let sql = format!(
            "UPDATE plants SET {} WHERE id = ?{idx} AND owner_id = ?{}",
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
        self.find_plant(owner_id, id).await
    }

    /// Returns `true` if a plant was deleted.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the delete fails.
    pub async fn delete_plant(&self, owner_id: &str, id: &str) -> Result<bool, DatabaseError> {
        let changed = self
            .db()
            .conn()
            .execute(
                "DELETE FROM plants WHERE id = ?1 AND owner_id = ?2",
                [id, owner_id],
            )
            .await?;
        Ok(changed > 0)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn count_plants(&self, owner_id: &str) -> Result<u64, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query("SELECT COUNT(*) FROM plants WHERE owner_id = ?1", [owner_id])
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

    #[tokio::test]
    async fn crud_is_owner_scoped() {
        let svc = test_service().await;
        let mine = svc.create_plant("u1", "Jagung A", Some("Blok 1")).await.unwrap();
        svc.create_plant("u2", "Jagung B", None).await.unwrap();

        let listed = svc.list_plants("u1").await.unwrap();
        assert_eq!(listed, vec![mine.clone()]);
        assert_eq!(svc.count_plants("u2").await.unwrap(), 1);

        assert!(svc.find_plant("u2", &mine.id).await.unwrap().is_none());
        assert!(!svc.delete_plant("u2", &mine.id).await.unwrap());
        assert!(svc.find_plant("u1", &mine.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn update_renames_and_relocates() {
        let svc = test_service().await;
        let plant = svc.create_plant("u1", "Jagung A", None).await.unwrap();

        let update = PlantUpdate {
            name: Some("Jagung Manis".into()),
            location: Some("Blok 3".into()),
        };
        let updated = svc
            .update_plant("u1", &plant.id, &update)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "Jagung Manis");
        assert_eq!(updated.location.as_deref(), Some("Blok 3"));

        assert!(svc
            .update_plant("u2", &plant.id, &update)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn empty_update_returns_current() {
        let svc = test_service().await;
        let plant = svc.create_plant("u1", "Jagung A", None).await.unwrap();
        let same = svc
            .update_plant("u1", &plant.id, &PlantUpdate::default())
            .await
            .unwrap();
        assert_eq!(same, Some(plant));
    }

    #[tokio::test]
    async fn delete_removes_plant() {
        let svc = test_service().await;
        let plant = svc.create_plant("u1", "Jagung A", None).await.unwrap();
        assert!(svc.delete_plant("u1", &plant.id).await.unwrap());
        assert!(svc.find_plant("u1", &plant.id).await.unwrap().is_none());
        assert_eq!(svc.count_plants("u1").await.unwrap(), 0);
    }
}
