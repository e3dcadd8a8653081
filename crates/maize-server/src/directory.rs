//! [`UserDirectory`] backed by the libSQL user table.

use std::sync::Arc;

use async_trait::async_trait;
use maize_auth::{DirectoryError, UserDirectory};
use maize_core::entities::{NewUser, User};
use maize_db::MaizeService;
use maize_db::error::DatabaseError;

#[derive(Clone)]
pub struct DbDirectory {
    db: Arc<MaizeService>,
}

impl DbDirectory {
    #[must_use]
    pub const fn new(db: Arc<MaizeService>) -> Self {
        Self { db }
    }
}

fn directory_error(err: DatabaseError) -> DirectoryError {
    match err {
        DatabaseError::UniqueViolation { field } => DirectoryError::UniqueViolation { field },
        other => DirectoryError::Unavailable(other.to_string()),
    }
}

#[async_trait]
impl UserDirectory for DbDirectory {
    async fn find_by_subject_id(&self, subject_id: &str) -> Result<Option<User>, DirectoryError> {
        self.db
            .find_user_by_subject(subject_id)
            .await
            .map_err(directory_error)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, DirectoryError> {
        self.db.find_user(id).await.map_err(directory_error)
    }

    async fn create(&self, new: NewUser) -> Result<User, DirectoryError> {
        self.db.create_user(new).await.map_err(directory_error)
    }
}
