use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::Severity;

/// A logged disease detection, usually produced by `/diseases/predict`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Disease {
    pub id: String,
    pub name: String,
    pub severity: Severity,
    pub detected_at: DateTime<Utc>,
    pub image_path: Option<String>,
    pub confidence: Option<f64>,
    pub user_id: String,
    pub plant_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
