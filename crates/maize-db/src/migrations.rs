//! Schema migrations, embedded at compile time.
//!
//! The applied version is kept in `PRAGMA user_version`; opening a database
//! runs only the scripts above it.

use crate::MaizeDb;
use crate::error::DatabaseError;

/// `(version, name, sql)`, in ascending version order.
const MIGRATIONS: &[(i64, &str, &str)] = &[(
    1,
    "001_initial",
    include_str!("../migrations/001_initial.sql"),
)];

impl MaizeDb {
    async fn schema_version(&self) -> Result<i64, DatabaseError> {
        let mut rows = self.conn.query("PRAGMA user_version", ()).await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<i64>(0)?)
    }

    /// Apply pending migrations. Returns how many ran.
    pub(crate) async fn run_migrations(&self) -> Result<usize, DatabaseError> {
        let current = self.schema_version().await?;
        let mut applied = 0;
        for (version, name, sql) in MIGRATIONS.iter().filter(|(v, ..)| *v > current) {
            let script = format!("BEGIN;\n{sql}\nPRAGMA user_version = {version};\nCOMMIT;");
            self.conn
                .execute_batch(&script)
                .await
                .map_err(|e| DatabaseError::Migration(format!("{name}: {e}")))?;
            tracing::info!(migration = name, "applied migration");
            applied += 1;
        }
        Ok(applied)
    }
}
