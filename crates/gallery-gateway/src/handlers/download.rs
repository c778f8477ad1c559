//! Download handler

use super::KeyParams;
use crate::error::GalleryOperation;
use crate::{ApiError, AppState};
use axum::{
    body::Body,
    extract::{rejection::QueryRejection, Query, State},
    http::{
        header::{CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE},
        HeaderValue,
    },
    response::{IntoResponse, Response},
};
use gallery_store::DEFAULT_CONTENT_TYPE;
use std::sync::Arc;

/// GET /api/gallery/download?key={key} - Stream an object as an attachment
pub async fn download_image(
    State(state): State<Arc<AppState>>,
    query: Result<Query<KeyParams>, QueryRejection>,
) -> Result<Response, ApiError> {
    let key = KeyParams::from_query(query)?;

    let object = state
        .store
        .get_object(&key)
        .await
        .map_err(|e| ApiError::store(GalleryOperation::Download, e))?;

    tracing::debug!(
        key = %key,
        content_length = ?object.content_length,
        "Streaming object"
    );

    let content_type = object
        .content_type
        .as_deref()
        .and_then(|ct| HeaderValue::from_str(ct).ok())
        .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_CONTENT_TYPE));
    let content_length = object.content_length;

    let mut response = Body::from_stream(object.stream).into_response();
    let headers = response.headers_mut();
    headers.insert(CONTENT_TYPE, content_type);
    headers.insert(CONTENT_DISPOSITION, content_disposition(&key));
    if let Some(len) = content_length {
        headers.insert(CONTENT_LENGTH, HeaderValue::from(len));
    }

    Ok(response)
}

/// Build an attachment disposition naming the file after `key`.
///
/// Non-ASCII keys get an ASCII fallback in `filename` plus the exact name in
/// an RFC 5987 `filename*` parameter.
pub fn content_disposition(key: &str) -> HeaderValue {
    let fallback: String = key
        .chars()
        .map(|c| if c.is_ascii() && !c.is_ascii_control() { c } else { '_' })
        .collect();
    let quoted = fallback.replace('\\', "\\\\").replace('"', "\\\"");

    let value = if key.is_ascii() && fallback == key {
        format!("attachment; filename=\"{}\"", quoted)
    } else {
        format!(
            "attachment; filename=\"{}\"; filename*=UTF-8''{}",
            quoted,
            urlencoding::encode(key)
        )
    };

    HeaderValue::from_str(&value).unwrap_or_else(|_| HeaderValue::from_static("attachment"))
}
