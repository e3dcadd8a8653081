use async_trait::async_trait;
use maize_core::entities::{NewUser, User};

use crate::error::DirectoryError;

/// Keyed store of local user records.
///
/// `create` must enforce uniqueness of subject id and email and report a
/// collision as [`DirectoryError::UniqueViolation`]; the resolver relies on
/// that to reconcile concurrent first logins.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_subject_id(&self, subject_id: &str) -> Result<Option<User>, DirectoryError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, DirectoryError>;

    async fn create(&self, user: NewUser) -> Result<User, DirectoryError>;
}
