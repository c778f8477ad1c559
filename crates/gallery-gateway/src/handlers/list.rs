//! List handler

use crate::error::GalleryOperation;
use crate::{ApiError, AppState};
use axum::{extract::State, Json};
use std::sync::Arc;

/// GET /api/gallery - List object keys
///
/// The listing is all-or-nothing: a store failure yields no partial result.
pub async fn list_images(State(state): State<Arc<AppState>>) -> Result<Json<Vec<String>>, ApiError> {
    let keys = state
        .store
        .list_keys()
        .await
        .map_err(|e| ApiError::store(GalleryOperation::List, e))?;

    tracing::debug!(count = keys.len(), "Listed gallery");
    Ok(Json(keys))
}
