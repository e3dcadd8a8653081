//! Response types serialized by the HTTP API.
//!
//! Every route answers with an [`Envelope`]; the payload types below are the
//! `data` shapes that are not plain entities.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{Notification, SoilReading};

/// Uniform JSON envelope: `{ success, message, data, statusCode }`.
///
/// Error responses carry `data: null`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
    pub status_code: u16,
}

impl<T> Envelope<T> {
    #[must_use]
    pub fn ok(data: T, message: impl Into<String>, status_code: u16) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            status_code,
        }
    }

    #[must_use]
    pub fn failure(message: impl Into<String>, status_code: u16) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            status_code,
        }
    }
}

/// Page metadata for `GET /soil-sensors`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Pagination {
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub pages: u64,
}

impl Pagination {
    #[must_use]
    pub const fn new(total: u64, page: u32, limit: u32) -> Self {
        let pages = if limit == 0 { 0 } else { total.div_ceil(limit as u64) };
        Self {
            total,
            page,
            limit,
            pages,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct SoilReadingPage {
    pub data: Vec<SoilReading>,
    pub pagination: Pagination,
}

/// Read/unread split of a notification inbox.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ReadBreakdown {
    pub read: u64,
    pub unread: u64,
}

/// Response from `GET /notifications/stats`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NotificationStats {
    pub total: u64,
    pub read: u64,
    pub unread: u64,
    pub by_type: BTreeMap<String, u64>,
}

/// Per-seed statistics returned by `POST /notifications/seed/dummy`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SeedStats {
    pub total: u64,
    pub by_type: BTreeMap<String, u64>,
    pub by_read: ReadBreakdown,
}

impl SeedStats {
    #[must_use]
    pub fn from_notifications(notifications: &[Notification]) -> Self {
        let mut stats = Self {
            total: notifications.len() as u64,
            ..Self::default()
        };
        for n in notifications {
            *stats.by_type.entry(n.kind.to_string()).or_default() += 1;
            if n.is_read {
                stats.by_read.read += 1;
            } else {
                stats.by_read.unread += 1;
            }
        }
        stats
    }
}

/// Response from `GET /dashboard`. Field names follow the mobile client.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct DashboardStats {
    pub user_name: String,
    pub total_plants: u64,
    pub healthy_plants: u64,
    pub sick_plants: u64,
    pub humidity: f64,
    pub plants: u64,
    pub diseases: u64,
    #[serde(rename = "latestHumidity")]
    pub latest_humidity: Option<SoilReading>,
}

/// Counts returned by the dashboard seeder.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SeedSummary {
    pub plants: u64,
    pub diseases: u64,
    pub humidity: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn failure_envelope_has_null_data() {
        let env: Envelope<()> = Envelope::failure("User not authenticated", 401);
        let json = serde_json::to_value(&env).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "success": false,
                "message": "User not authenticated",
                "data": null,
                "statusCode": 401
            })
        );
    }

    #[test]
    fn pagination_rounds_pages_up() {
        assert_eq!(Pagination::new(21, 1, 10).pages, 3);
        assert_eq!(Pagination::new(20, 1, 10).pages, 2);
        assert_eq!(Pagination::new(0, 1, 10).pages, 0);
        assert_eq!(Pagination::new(5, 1, 0).pages, 0);
    }
}
