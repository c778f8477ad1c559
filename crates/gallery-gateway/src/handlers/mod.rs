//! Gallery API request handlers
//!
//! Each handler performs exactly one object store call.

pub mod delete;
pub mod download;
pub mod list;
pub mod service;
pub mod upload;

pub use delete::*;
pub use download::*;
pub use list::*;
pub use service::*;
pub use upload::*;

use crate::ApiError;
use axum::extract::{rejection::QueryRejection, Query};
use serde::{Deserialize, Serialize};

/// Query parameters for handlers addressing a single object
#[derive(Debug, Default, Deserialize)]
pub struct KeyParams {
    pub key: Option<String>,
}

impl KeyParams {
    /// Resolve the key from an extracted query string
    ///
    /// A query that fails to deserialize, such as a repeated `key`, is a
    /// client error.
    pub fn from_query(query: Result<Query<Self>, QueryRejection>) -> Result<String, ApiError> {
        let Query(params) = query.map_err(|rejection| ApiError::InvalidQuery(rejection.body_text()))?;
        params.require_key()
    }

    /// The requested key; an empty value counts as missing
    pub fn require_key(self) -> Result<String, ApiError> {
        self.key
            .filter(|key| !key.is_empty())
            .ok_or(ApiError::MissingParameter("key"))
    }
}

/// Confirmation body for mutations
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl MessageResponse {
    pub fn new(message: &'static str) -> Self {
        Self { message, key: None }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }
}
