use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One soil-sensor sample.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SoilReading {
    pub id: String,
    pub user_id: String,
    pub plant_id: Option<String>,
    /// Relative humidity, percent. Always within `0..=100`.
    pub humidity: f64,
    pub temperature: Option<f64>,
    pub sensor_id: Option<String>,
    pub location: Option<String>,
    pub recorded_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SoilReading {
    pub const HUMIDITY_MIN: f64 = 0.0;
    pub const HUMIDITY_MAX: f64 = 100.0;

    #[must_use]
    pub fn humidity_in_range(value: f64) -> bool {
        (Self::HUMIDITY_MIN..=Self::HUMIDITY_MAX).contains(&value)
    }
}
