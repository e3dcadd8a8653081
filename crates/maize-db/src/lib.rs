//! # maize-db
//!
//! libSQL persistence for MaizeCare.
//!
//! One embedded database file holds users, plants, disease detections, soil
//! readings, and notifications. Repositories live under [`repos`] as
//! `impl MaizeService` blocks; apart from the user lookups, every query takes
//! the owner id as its first filter.
//!
//! Built on `libsql` (v0.9.29). Tests run against `:memory:`.

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod service;
pub mod updates;

#[cfg(test)]
mod test_support;

use error::DatabaseError;
use libsql::{Builder, Connection, Database};

pub use service::MaizeService;

/// Settings applied to every new connection.
const CONNECTION_PRAGMAS: &[&str] = &["PRAGMA foreign_keys = ON"];

/// Owns the libSQL database and the single connection shared by all requests.
pub struct MaizeDb {
    // Dropping the `Database` closes the file; keep it alive with the connection.
    _database: Database,
    conn: Connection,
}

impl MaizeDb {
    /// Open (or create) the database at `path` and bring the schema up to date.
    ///
    /// # Errors
    ///
    /// `DatabaseError::Migration` when a pragma or migration fails, or the
    /// underlying libSQL error when the file cannot be opened.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let database = Builder::new_local(path).build().await?;
        let conn = database.connect()?;
        for pragma in CONNECTION_PRAGMAS {
            conn.execute(pragma, ())
                .await
                .map_err(|e| DatabaseError::Migration(format!("{pragma}: {e}")))?;
        }

        let db = Self {
            _database: database,
            conn,
        };
        let applied = db.run_migrations().await?;
        tracing::debug!(path, applied, "database ready");
        Ok(db)
    }

    #[must_use]
    pub const fn conn(&self) -> &Connection {
        &self.conn
    }

    /// New record id: the prefix, a dash, and 8 random hex digits (`plt-a3f8b2c1`).
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn generate_id(&self, prefix: &str) -> Result<String, DatabaseError> {
        let mut rows = self
            .conn
            .query("SELECT lower(hex(randomblob(4)))", ())
            .await?;
        let suffix: String = rows.next().await?.ok_or(DatabaseError::NoResult)?.get(0)?;
        Ok(format!("{prefix}-{suffix}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    async fn memory_db() -> MaizeDb {
        MaizeDb::open_local(":memory:").await.unwrap()
    }

    async fn table_names(db: &MaizeDb) -> Vec<String> {
        let mut rows = db
            .conn()
            .query(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
                (),
            )
            .await
            .unwrap();
        let mut names = Vec::new();
        while let Some(row) = rows.next().await.unwrap() {
            names.push(row.get::<String>(0).unwrap());
        }
        names
    }

    #[tokio::test]
    async fn schema_has_every_table() {
        let db = memory_db().await;
        assert_eq!(
            table_names(&db).await,
            ["diseases", "notifications", "plants", "soil_readings", "users"]
        );
    }

    #[tokio::test]
    async fn foreign_keys_are_enforced() {
        let db = memory_db().await;
        let mut rows = db.conn().query("PRAGMA foreign_keys", ()).await.unwrap();
        let on: i64 = rows.next().await.unwrap().unwrap().get(0).unwrap();
        assert_eq!(on, 1);
    }

    #[rstest]
    #[case("usr")]
    #[case("plt")]
    #[case("ntf")]
    #[tokio::test]
    async fn ids_carry_prefix_and_hex_suffix(#[case] prefix: &str) {
        let db = memory_db().await;
        let id = db.generate_id(prefix).await.unwrap();
        let (head, tail) = id.split_once('-').unwrap();
        assert_eq!(head, prefix);
        assert_eq!(tail.len(), 8);
        assert!(tail.bytes().all(|b| b.is_ascii_hexdigit() && !b.is_ascii_uppercase()));
    }

    #[tokio::test]
    async fn ids_do_not_repeat() {
        let db = memory_db().await;
        let mut seen = std::collections::BTreeSet::new();
        for _ in 0..200 {
            assert!(seen.insert(db.generate_id("dis").await.unwrap()));
        }
    }
}
