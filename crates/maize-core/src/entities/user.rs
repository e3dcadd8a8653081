use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::UserRole;

/// A local user record. Created on registration or on first login.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    /// Identity-provider subject id. Unique when set.
    pub subject_id: Option<String>,
    pub name: String,
    /// Unique when set.
    pub email: Option<String>,
    #[serde(rename = "photoURL")]
    pub photo_url: Option<String>,
    pub role: UserRole,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub is_active: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields needed to create a [`User`]; the directory assigns the rest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub subject_id: Option<String>,
    pub name: String,
    pub email: Option<String>,
    pub photo_url: Option<String>,
}
