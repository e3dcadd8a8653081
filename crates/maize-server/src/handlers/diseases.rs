//! `/diseases`: leaf-image prediction and detection history.

use axum::body::Bytes;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, Path, State};
use chrono::Utc;
use maize_core::entities::Disease;
use maize_core::enums::Severity;
use maize_db::repos::NewDisease;
use serde::Serialize;

use crate::error::{ApiError, ApiResult};
use crate::extract::CurrentUser;
use crate::response::Reply;
use crate::state::AppState;
use crate::uploads::{self, REJECTED_EXTENSION};

/// Detections returned by `GET /diseases`.
pub const HISTORY_LIMIT: u32 = 20;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionPayload {
    pub disease: String,
    pub confidence: f64,
    pub description: String,
    pub recommendations: Vec<String>,
    pub disease_id: String,
    pub image_url: String,
}

struct LeafImage {
    ext: String,
    bytes: Bytes,
}

/// `POST /diseases/predict`, multipart with the image in field `file` and an
/// optional `plantId`.
pub async fn predict(
    State(state): State<AppState>,
    current: CurrentUser,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Reply<PredictionPayload>> {
    let mut multipart = multipart.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let max_bytes = state.config.uploads.max_bytes;
    let mut image = None;
    let mut plant_id = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let ext = field
                    .file_name()
                    .and_then(uploads::allowed_extension)
                    .ok_or_else(|| {
                        tracing::warn!(file_name = ?field.file_name(), "rejected upload");
                        ApiError::bad_request(REJECTED_EXTENSION)
                    })?;
                let bytes = field.bytes().await?;
                if bytes.len() > max_bytes {
                    return Err(ApiError::PayloadTooLarge("File too large".into()));
                }
                image = Some(LeafImage { ext, bytes });
            }
            Some("plantId") => {
                let value = field.text().await?;
                let value = value.trim();
                if !value.is_empty() {
                    plant_id = Some(value.to_string());
                }
            }
            _ => {}
        }
    }

    let Some(image) = image else {
        return Err(ApiError::bad_request("No image file uploaded"));
    };

    if let Some(ref plant_id) = plant_id {
        if state.db.find_plant(current.id(), plant_id).await?.is_none() {
            return Err(ApiError::not_found("Plant not found"));
        }
    }

    let stored = uploads::store(&state.config.uploads.dir, &image.ext, &image.bytes)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to store image: {e}")))?;

    let verdict = state.classifier.classify(&image.bytes);
    let record = NewDisease {
        user_id: current.id().to_string(),
        plant_id,
        name: verdict.disease.to_string(),
        severity: Severity::from_confidence(verdict.confidence),
        confidence: Some(verdict.confidence),
        image_path: Some(stored.path.display().to_string()),
        detected_at: Utc::now(),
    };

    let disease = match state.db.create_disease(record).await {
        Ok(disease) => disease,
        Err(e) => {
            stored.discard().await;
            return Err(ApiError::Internal(format!("Prediction failed: {e}")));
        }
    };

    tracing::info!(
        disease_id = %disease.id,
        disease = verdict.disease,
        confidence = verdict.confidence,
        "recorded prediction"
    );
    Ok(Reply::created(
        PredictionPayload {
            disease: disease.name,
            confidence: verdict.confidence,
            description: verdict.description.to_string(),
            recommendations: verdict
                .recommendations
                .iter()
                .map(|r| (*r).to_string())
                .collect(),
            disease_id: disease.id,
            image_url: stored.url(),
        },
        "Prediction successful",
    ))
}

/// `GET /diseases`
pub async fn list(
    State(state): State<AppState>,
    current: CurrentUser,
) -> ApiResult<Reply<Vec<Disease>>> {
    let diseases = state
        .db
        .list_recent_diseases(current.id(), HISTORY_LIMIT)
        .await?;
    Ok(Reply::ok(diseases))
}

/// `GET /diseases/{id}`
pub async fn detail(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Reply<Disease>> {
    let disease = state
        .db
        .find_disease(current.id(), &id)
        .await?
        .ok_or_else(|| ApiError::not_found("Disease not found"))?;
    Ok(Reply::ok(disease))
}
