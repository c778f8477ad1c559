//! Common types for the client SDK

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A file to upload
#[derive(Clone, Debug)]
pub struct UploadRequest {
    /// Filename reported to the gateway
    pub file_name: String,
    /// File content
    pub data: Bytes,
    /// MIME type; guessed from the filename when unset
    pub content_type: Option<String>,
    /// Name to store the file under instead of `file_name`
    pub custom_name: Option<String>,
}

impl UploadRequest {
    /// Create an upload from in-memory content
    pub fn new(file_name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            data: data.into(),
            content_type: None,
            custom_name: None,
        }
    }

    /// Read an upload from a file on disk
    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let data = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(file_name, data))
    }

    /// Set the content type
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Store under a different name
    pub fn with_custom_name(mut self, name: impl Into<String>) -> Self {
        self.custom_name = Some(name.into());
        self
    }

    /// Content type to declare, guessed from the filename when not set
    pub fn resolved_content_type(&self) -> String {
        self.content_type.clone().unwrap_or_else(|| {
            mime_guess::from_path(&self.file_name)
                .first_or_octet_stream()
                .essence_str()
                .to_string()
        })
    }
}

/// Gateway answer to an upload
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UploadResult {
    /// Confirmation message
    pub message: String,
    /// Key the file was stored under
    #[serde(default)]
    pub key: Option<String>,
}

/// A downloaded object
#[derive(Clone, Debug)]
pub struct DownloadedImage {
    /// Requested key
    pub key: String,
    /// Filename from the attachment disposition
    pub file_name: Option<String>,
    /// Content type reported by the gateway
    pub content_type: Option<String>,
    /// Object content
    pub data: Bytes,
}

impl DownloadedImage {
    /// Name to save the download under
    ///
    /// The last usable path segment of the attachment filename, else of the
    /// key. Never empty, `.` or `..`.
    pub fn save_name(&self) -> String {
        self.file_name
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.key.as_str()))
            .find_map(last_segment)
            .unwrap_or(FALLBACK_SAVE_NAME)
            .to_string()
    }
}

/// Saved filename when neither the disposition nor the key has a usable segment
pub const FALLBACK_SAVE_NAME: &str = "download";

fn last_segment(name: &str) -> Option<&str> {
    name.rsplit(['/', '\\'])
        .find(|segment| !segment.is_empty() && *segment != "." && *segment != "..")
}

/// Display order for the gallery listing
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    /// Order returned by the store
    #[default]
    Original,
    /// Key, A to Z
    NameAsc,
    /// Key, Z to A
    NameDesc,
    /// Extension, then key
    ExtensionAsc,
}

/// Parse the filename of a `Content-Disposition` header
///
/// An RFC 5987 `filename*=UTF-8''...` parameter wins over the quoted
/// `filename` fallback.
pub fn parse_attachment_filename(disposition: &str) -> Option<String> {
    extended_filename(disposition).or_else(|| quoted_filename(disposition))
}

fn extended_filename(disposition: &str) -> Option<String> {
    let start = disposition.find("filename*=")? + "filename*=".len();
    let value = disposition[start..].split(';').next()?.trim();
    let (charset, rest) = value.split_once('\'')?;
    let (_language, encoded) = rest.split_once('\'')?;

    if !charset.eq_ignore_ascii_case("utf-8") || encoded.is_empty() {
        return None;
    }

    urlencoding::decode(encoded).ok().map(|name| name.into_owned())
}

fn quoted_filename(disposition: &str) -> Option<String> {
    let start = disposition.find("filename=\"")? + "filename=\"".len();
    let mut name = String::new();
    let mut chars = disposition[start..].chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => name.push(chars.next()?),
            '"' => return Some(name),
            _ => name.push(c),
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("attachment; filename=\"cat.png\"", Some("cat.png"))]
    #[case("attachment; filename=\"say \\\"hi\\\".png\"", Some("say \"hi\".png"))]
    #[case("attachment; filename=\"caf_.png\"; filename*=UTF-8''caf%C3%A9.png", Some("café.png"))]
    #[case("attachment; filename*=utf-8''%E7%8C%AB.jpg", Some("猫.jpg"))]
    #[case("attachment; filename=\"line_break.png\"; filename*=UTF-8''line%0Abreak.png", Some("line\nbreak.png"))]
    #[case("attachment; filename=\"x.png\"; filename*=ISO-8859-1''x%E9.png", Some("x.png"))]
    #[case("attachment", None)]
    #[case("attachment; filename=\"unterminated", None)]
    fn test_parse_attachment_filename(#[case] header: &str, #[case] expected: Option<&str>) {
        assert_eq!(parse_attachment_filename(header).as_deref(), expected);
    }

    #[test]
    fn test_content_type_is_guessed_from_name() {
        assert_eq!(UploadRequest::new("cat.png", "x").resolved_content_type(), "image/png");
        assert_eq!(
            UploadRequest::new("notes", "x").resolved_content_type(),
            "application/octet-stream"
        );
        assert_eq!(
            UploadRequest::new("cat.png", "x")
                .with_content_type("image/webp")
                .resolved_content_type(),
            "image/webp"
        );
    }

    #[test]
    fn test_save_name_drops_directories() {
        let image = DownloadedImage {
            key: "holiday/beach.jpg".to_string(),
            file_name: None,
            content_type: None,
            data: Bytes::new(),
        };
        assert_eq!(image.save_name(), "beach.jpg");
    }

    #[rstest]
    #[case(Some("café.png"), "caf_.png", "café.png")]
    #[case(None, "album/", "album")]
    #[case(None, "..", FALLBACK_SAVE_NAME)]
    #[case(None, "photos/../..", "photos")]
    #[case(Some("../secret.png"), "secret.png", "secret.png")]
    #[case(Some("/"), "a\\b.png", "b.png")]
    fn test_save_name_is_a_plain_filename(
        #[case] file_name: Option<&str>,
        #[case] key: &str,
        #[case] expected: &str,
    ) {
        let image = DownloadedImage {
            key: key.to_string(),
            file_name: file_name.map(str::to_string),
            content_type: None,
            data: Bytes::new(),
        };
        assert_eq!(image.save_name(), expected);
    }

    #[tokio::test]
    async fn test_upload_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dog.jpg");
        tokio::fs::write(&path, b"woof").await.unwrap();

        let request = UploadRequest::from_path(&path).await.unwrap();
        assert_eq!(request.file_name, "dog.jpg");
        assert_eq!(request.data.as_ref(), b"woof");
        assert_eq!(request.resolved_content_type(), "image/jpeg");
    }
}
