//! Service layer hosting the repository methods.
//!
//! `MaizeService` wraps `MaizeDb`; every repository is implemented as an
//! `impl MaizeService` block in [`crate::repos`].

use crate::MaizeDb;
use crate::error::DatabaseError;

pub struct MaizeService {
    db: MaizeDb,
}

impl MaizeService {
    /// Create a new service over a local database.
    ///
    /// # Arguments
    ///
    /// * `db_path` - Path to the libSQL database file, or `":memory:"` for tests.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str) -> Result<Self, DatabaseError> {
        let db = MaizeDb::open_local(db_path).await?;
        Ok(Self { db })
    }

    /// Create from an existing `MaizeDb`.
    #[must_use]
    pub const fn from_db(db: MaizeDb) -> Self {
        Self { db }
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &MaizeDb {
        &self.db
    }
}
