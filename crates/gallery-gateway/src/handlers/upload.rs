//! Upload handler

use super::MessageResponse;
use crate::error::GalleryOperation;
use crate::multipart::UploadForm;
use crate::{ApiError, AppState};
use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use std::sync::Arc;

/// POST /api/gallery/upload - Store one file from a multipart form
///
/// Responds only after the store confirms the write. Uploads to the same
/// key race, and the last write to reach the store wins.
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let multipart = multipart.map_err(|rejection| ApiError::MalformedUpload {
        status: rejection.status(),
        details: rejection.body_text(),
    })?;

    let upload = UploadForm::from_multipart(multipart).await?.resolve()?;
    let size = upload.data.len();

    state
        .store
        .put_object(&upload.key, upload.data, &upload.content_type)
        .await
        .map_err(|e| ApiError::store(GalleryOperation::Upload, e))?;

    tracing::info!(
        key = %upload.key,
        size,
        content_type = %upload.content_type,
        "Upload stored"
    );

    Ok(Json(MessageResponse::new("Upload success").with_key(upload.key)))
}
