//! Delete handler

use super::{KeyParams, MessageResponse};
use crate::error::GalleryOperation;
use crate::{ApiError, AppState};
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use std::sync::Arc;

/// DELETE /api/gallery/delete?key={key} - Delete object
///
/// Deleting a key that does not exist succeeds.
pub async fn delete_image(
    State(state): State<Arc<AppState>>,
    query: Result<Query<KeyParams>, QueryRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let key = KeyParams::from_query(query)?;

    state
        .store
        .delete_object(&key)
        .await
        .map_err(|e| ApiError::store(GalleryOperation::Delete, e))?;

    tracing::info!(key = %key, "Object deleted");
    Ok(Json(MessageResponse::new("Delete success")))
}
