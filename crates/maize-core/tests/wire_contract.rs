//! JSON shapes the mobile client depends on, checked against both literal
//! expectations and the generated JSON Schemas.

use chrono::{DateTime, TimeZone, Utc};
use maize_core::entities::{Disease, Notification, Plant, SoilReading, User};
use maize_core::enums::{NotificationKind, Severity, UserRole};
use maize_core::responses::{DashboardStats, Envelope, Pagination, SoilReadingPage};
use pretty_assertions::assert_eq;
use schemars::{JsonSchema, schema_for};
use serde_json::{Value, json};

fn at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 7, 30, 0).unwrap()
}

/// Serialize `value` and return it with any schema violations.
fn checked<T: serde::Serialize + JsonSchema>(value: &T) -> Value {
    let schema = serde_json::to_value(schema_for!(T)).unwrap();
    let instance = serde_json::to_value(value).unwrap();
    let validator = jsonschema::validator_for(&schema).unwrap();
    let errors: Vec<String> = validator.iter_errors(&instance).map(|e| e.to_string()).collect();
    assert!(errors.is_empty(), "{errors:?}");
    instance
}

fn schema_accepts<T: JsonSchema>(instance: &Value) -> bool {
    let schema = serde_json::to_value(schema_for!(T)).unwrap();
    jsonschema::validator_for(&schema).unwrap().is_valid(instance)
}

fn reading(plant_id: Option<&str>) -> SoilReading {
    SoilReading {
        id: "soi-0000000a".into(),
        user_id: "usr-0000000a".into(),
        plant_id: plant_id.map(Into::into),
        humidity: 64.5,
        temperature: Some(27.0),
        sensor_id: Some("S-1".into()),
        location: None,
        recorded_at: at(),
        created_at: at(),
        updated_at: at(),
    }
}

#[test]
fn user_uses_client_field_names() {
    let user = User {
        id: "usr-0000000a".into(),
        subject_id: Some("abc123".into()),
        name: "a".into(),
        email: Some("a@x.com".into()),
        photo_url: Some("https://img".into()),
        role: UserRole::Farmer,
        phone: None,
        location: Some("Malang".into()),
        bio: None,
        is_active: true,
        last_login: None,
        created_at: at(),
        updated_at: at(),
    };
    let json = checked(&user);
    assert_eq!(
        json,
        json!({
            "id": "usr-0000000a",
            "subjectId": "abc123",
            "name": "a",
            "email": "a@x.com",
            "photoURL": "https://img",
            "role": "farmer",
            "phone": null,
            "location": "Malang",
            "bio": null,
            "isActive": true,
            "lastLogin": null,
            "createdAt": "2026-03-01T07:30:00Z",
            "updatedAt": "2026-03-01T07:30:00Z"
        })
    );
}

#[test]
fn failure_envelope_has_null_data() {
    let envelope: Envelope<Plant> = Envelope::failure("Plant not found", 404);
    assert_eq!(
        checked(&envelope),
        json!({ "success": false, "message": "Plant not found", "data": null, "statusCode": 404 })
    );
}

#[test]
fn notification_kind_is_named_type() {
    let notification = Notification {
        id: "ntf-0000000a".into(),
        user_id: "usr-0000000a".into(),
        title: "Kelembaban Optimal".into(),
        body: "60-70%".into(),
        kind: NotificationKind::Success,
        is_read: false,
        created_at: at(),
    };
    let json = checked(&notification);
    assert_eq!(json["type"], "success");
    assert_eq!(json["isRead"], false);
    assert!(json.get("kind").is_none());
}

#[test]
fn disease_and_soil_page_validate() {
    let disease = Disease {
        id: "dis-0000000a".into(),
        name: "Common Rust".into(),
        severity: Severity::High,
        detected_at: at(),
        image_path: Some("uploads/leaf-1.png".into()),
        confidence: Some(0.85),
        user_id: "dev42".into(),
        plant_id: None,
        created_at: at(),
        updated_at: at(),
    };
    assert_eq!(checked(&disease)["severity"], "high");

    let page = SoilReadingPage {
        data: vec![reading(Some("plt-0000000a")), reading(None)],
        pagination: Pagination::new(12, 2, 10),
    };
    let json = checked(&page);
    assert_eq!(json["pagination"], json!({ "total": 12, "page": 2, "limit": 10, "pages": 2 }));
    assert_eq!(json["data"][0]["plantId"], "plt-0000000a");
}

#[test]
fn dashboard_mixes_snake_and_camel_case() {
    let stats = DashboardStats {
        user_name: "Dev User farmer1".into(),
        total_plants: 5,
        healthy_plants: 4,
        sick_plants: 1,
        humidity: 64.5,
        plants: 5,
        diseases: 1,
        latest_humidity: Some(reading(None)),
    };
    let json = checked(&stats);
    assert_eq!(json["user_name"], "Dev User farmer1");
    assert_eq!(json["healthy_plants"], 4);
    assert_eq!(json["latestHumidity"]["humidity"], 64.5);
}

#[test]
fn schemas_reject_unknown_enum_values() {
    let mut disease = json!({
        "id": "dis-1", "name": "x", "severity": "critical",
        "detectedAt": "2026-03-01T07:30:00Z", "imagePath": null, "confidence": null,
        "userId": "u", "plantId": null,
        "createdAt": "2026-03-01T07:30:00Z", "updatedAt": "2026-03-01T07:30:00Z"
    });
    assert!(!schema_accepts::<Disease>(&disease));
    disease["severity"] = json!("medium");
    assert!(schema_accepts::<Disease>(&disease));
}

#[test]
fn empty_page_has_zero_pages() {
    assert_eq!(Pagination::new(0, 1, 10).pages, 0);
    assert_eq!(Pagination::new(10, 1, 10).pages, 1);
    assert_eq!(Pagination::new(11, 1, 10).pages, 2);
}
