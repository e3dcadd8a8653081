use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A row could not be decoded into its entity.
    #[error("query failed: {0}")]
    Query(String),

    #[error("migration failed: {0}")]
    Migration(String),

    #[error("query returned no rows")]
    NoResult,

    /// An insert or update collided with a UNIQUE column.
    #[error("unique constraint violated on {field}")]
    UniqueViolation { field: String },

    #[error(transparent)]
    LibSql(#[from] libsql::Error),
}

impl DatabaseError {
    /// Reclassify a libSQL error as [`DatabaseError::UniqueViolation`] when it
    /// reports a UNIQUE constraint failure.
    ///
    /// `SQLite` formats these as `UNIQUE constraint failed: users.email`; the
    /// column name after the table prefix becomes `field`.
    #[must_use]
    pub fn from_write(e: libsql::Error) -> Self {
        let msg = e.to_string();
        match msg.split_once("UNIQUE constraint failed:") {
            Some((_, cols)) => {
                let column: String = cols
                    .trim_start()
                    .chars()
                    .take_while(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '.')
                    .collect();
                let field = column
                    .rsplit_once('.')
                    .map_or(column.as_str(), |(_, c)| c)
                    .to_string();
                Self::UniqueViolation { field }
            }
            None => Self::LibSql(e),
        }
    }
}
