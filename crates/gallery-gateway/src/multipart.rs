//! Multipart form parsing for uploads

use crate::ApiError;
use axum::extract::multipart::{Multipart, MultipartError};
use bytes::Bytes;
use gallery_store::DEFAULT_CONTENT_TYPE;
use tracing::debug;

/// Form field carrying the file
pub const FILE_FIELD: &str = "file";

/// Optional form field overriding the stored name
pub const NAME_FIELD: &str = "name";

/// The file part of an upload form
#[derive(Clone, Debug)]
pub struct UploadedFile {
    /// Filename reported by the client
    pub file_name: Option<String>,
    /// Declared MIME type
    pub content_type: Option<String>,
    /// File content
    pub data: Bytes,
}

impl UploadedFile {
    /// Browsers submit an empty, unnamed part for an empty file input
    fn is_placeholder(&self) -> bool {
        self.file_name.as_deref().unwrap_or_default().is_empty() && self.data.is_empty()
    }
}

/// A parsed upload form
#[derive(Clone, Debug, Default)]
pub struct UploadForm {
    /// First `file` field, if any
    pub file: Option<UploadedFile>,
    /// Value of the `name` field
    pub custom_name: Option<String>,
}

/// An upload ready to be written to the store
#[derive(Clone, Debug)]
pub struct ResolvedUpload {
    /// Destination key
    pub key: String,
    /// Content type to record
    pub content_type: String,
    /// Object content
    pub data: Bytes,
}

impl UploadForm {
    /// Read every field of the form
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await.map_err(malformed)? {
            let field_name = field.name().unwrap_or_default().to_string();

            match field_name.as_str() {
                FILE_FIELD if form.file.is_some() => {
                    debug!("Ignoring additional file field");
                }
                FILE_FIELD => {
                    let file_name = field.file_name().map(str::to_string);
                    let content_type = field.content_type().map(str::to_string);
                    let data = field.bytes().await.map_err(malformed)?;
                    form.file = Some(UploadedFile {
                        file_name,
                        content_type,
                        data,
                    });
                }
                NAME_FIELD => {
                    form.custom_name = Some(field.text().await.map_err(malformed)?);
                }
                other => {
                    debug!(field = %other, "Ignoring unknown form field");
                }
            }
        }

        Ok(form)
    }

    /// Validate the form and resolve the destination key
    pub fn resolve(self) -> Result<ResolvedUpload, ApiError> {
        let file = self
            .file
            .filter(|file| !file.is_placeholder())
            .ok_or(ApiError::NoFile)?;

        let key = resolve_key(self.custom_name.as_deref(), file.file_name.as_deref());
        let content_type = file
            .content_type
            .filter(|ct| ct.parse::<mime::Mime>().is_ok())
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());

        Ok(ResolvedUpload {
            key,
            content_type,
            data: file.data,
        })
    }
}

/// Pick the destination key: custom name, else the client's filename, else a
/// generated name.
pub fn resolve_key(custom_name: Option<&str>, file_name: Option<&str>) -> String {
    custom_name
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .or_else(|| file_name.filter(|name| !name.trim().is_empty()))
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().simple().to_string())
}

fn malformed(err: MultipartError) -> ApiError {
    ApiError::MalformedUpload {
        status: err.status(),
        details: err.body_text(),
    }
}
