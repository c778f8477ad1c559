//! Error types and their HTTP mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use gallery_store::StoreError;
use serde::Serialize;
use thiserror::Error;

/// Gateway operations, one per handler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GalleryOperation {
    List,
    Upload,
    Download,
    Delete,
}

impl GalleryOperation {
    /// Get the operation name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Upload => "upload",
            Self::Download => "download",
            Self::Delete => "delete",
        }
    }

    /// Message shown to callers when the store call fails
    pub fn failure_message(&self) -> &'static str {
        match self {
            Self::List => "Failed to list images",
            Self::Upload => "Failed to upload",
            Self::Download => "Failed to download image",
            Self::Delete => "Failed to delete image",
        }
    }
}

impl std::fmt::Display for GalleryOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// API error type
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Missing {0} parameter")]
    MissingParameter(&'static str),

    #[error("Invalid query string: {0}")]
    InvalidQuery(String),

    #[error("No file uploaded")]
    NoFile,

    #[error("Upload failed: {details}")]
    MalformedUpload { status: StatusCode, details: String },

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("{operation} failed: {source}")]
    Store {
        operation: GalleryOperation,
        #[source]
        source: StoreError,
    },
}

/// JSON error body
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl ApiError {
    /// Wrap a store failure for the given operation
    pub fn store(operation: GalleryOperation, source: StoreError) -> Self {
        Self::Store { operation, source }
    }

    /// Get the HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingParameter(_) | Self::InvalidQuery(_) | Self::NoFile => {
                StatusCode::BAD_REQUEST
            }
            Self::MalformedUpload { status, .. } => *status,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            // Not-found is reported like any other store failure.
            Self::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short message returned to the caller
    pub fn client_message(&self) -> &'static str {
        match self {
            Self::MissingParameter("key") => "Missing key parameter",
            Self::MissingParameter(_) => "Missing parameter",
            Self::InvalidQuery(_) => "Invalid key parameter",
            Self::NoFile => "No file uploaded",
            Self::MalformedUpload { .. } => "Upload failed",
            Self::MethodNotAllowed => "Method not allowed",
            Self::Store { operation, .. } => operation.failure_message(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let details = match &self {
            Self::Store { operation, source } => {
                tracing::error!(operation = %operation, error = %source, "Store operation failed");
                None
            }
            Self::MalformedUpload { details, .. } => {
                tracing::warn!(details = %details, "Rejected malformed upload");
                Some(details.clone())
            }
            Self::InvalidQuery(details) => {
                tracing::debug!(details = %details, "Rejected query string");
                Some(details.clone())
            }
            _ => {
                tracing::debug!(status = %status.as_u16(), error = %self, "Rejected request");
                None
            }
        };

        let body = ErrorBody {
            error: self.client_message(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_missing_key_is_client_error() {
        let (status, body) = body_json(ApiError::MissingParameter("key")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing key parameter");
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn test_invalid_query_is_json_client_error() {
        let err = ApiError::InvalidQuery("duplicate field `key`".to_string());
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid key parameter");
        assert_eq!(body["details"], "duplicate field `key`");
    }

    #[tokio::test]
    async fn test_not_found_collapses_to_server_error() {
        let err = ApiError::store(
            GalleryOperation::Download,
            StoreError::NotFound("missing.png".to_string()),
        );
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to download image");
    }

    #[tokio::test]
    async fn test_store_detail_is_not_leaked() {
        let err = ApiError::store(
            GalleryOperation::List,
            StoreError::backend("ListObjectsV2", "AccessDenied: secret bucket policy"),
        );
        let (_, body) = body_json(err).await;
        assert_eq!(body["error"], "Failed to list images");
        assert!(!body.to_string().contains("AccessDenied"));
    }

    #[tokio::test]
    async fn test_malformed_upload_keeps_parser_status() {
        let err = ApiError::MalformedUpload {
            status: StatusCode::PAYLOAD_TOO_LARGE,
            details: "length limit exceeded".to_string(),
        };
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["error"], "Upload failed");
        assert_eq!(body["details"], "length limit exceeded");
    }

    #[test]
    fn test_failure_messages() {
        assert_eq!(GalleryOperation::Upload.failure_message(), "Failed to upload");
        assert_eq!(GalleryOperation::Delete.failure_message(), "Failed to delete image");
        assert_eq!(ApiError::MethodNotAllowed.status_code(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(ApiError::NoFile.client_message(), "No file uploaded");
    }
}
