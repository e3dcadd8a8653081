//! Shared test utilities for maize-db unit tests.

use crate::MaizeDb;
use crate::service::MaizeService;

/// Create an in-memory `MaizeService`.
pub async fn test_service() -> MaizeService {
    let db = MaizeDb::open_local(":memory:").await.unwrap();
    MaizeService::from_db(db)
}
