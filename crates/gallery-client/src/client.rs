//! Main client implementation

use crate::{types::*, ClientError, Config, Result};
use reqwest::{
    header,
    multipart::{Form, Part},
    Client, RequestBuilder, Response,
};
use std::path::Path;
use tracing::{debug, instrument};

/// Gallery gateway client
#[derive(Clone)]
pub struct GalleryClient {
    config: Config,
    http: Client,
}

impl GalleryClient {
    /// Create a new client with the given configuration
    pub fn new(config: Config) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        let user_agent = config
            .user_agent
            .parse()
            .map_err(|_| ClientError::Config(format!("invalid user agent: {}", config.user_agent)))?;
        headers.insert(header::USER_AGENT, user_agent);

        let http = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .map_err(ClientError::Http)?;

        Ok(Self { config, http })
    }

    /// Create with default configuration
    pub fn default_local() -> Result<Self> {
        Self::new(Config::default())
    }

    /// Create with endpoint URL
    pub fn with_endpoint(endpoint: &str) -> Result<Self> {
        Self::new(Config::new(endpoint))
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// List every key in the gallery, in store order
    #[instrument(skip(self))]
    pub async fn list_images(&self) -> Result<Vec<String>> {
        let request = self.http.get(self.config.url("/api/gallery"));
        let response = self.send(request).await?;
        let body = response.text().await?;

        serde_json::from_str(&body)
            .map_err(|e| ClientError::InvalidResponse(format!("expected a JSON array of keys: {}", e)))
    }

    /// Upload a file
    #[instrument(skip(self, upload), fields(file_name = %upload.file_name, size = upload.data.len()))]
    pub async fn upload_image(&self, upload: &UploadRequest) -> Result<UploadResult> {
        let part = Part::bytes(upload.data.to_vec())
            .file_name(upload.file_name.clone())
            .mime_str(&upload.resolved_content_type())?;

        let mut form = Form::new().part("file", part);
        if let Some(name) = upload.custom_name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            form = form.text("name", name.to_string());
        }

        let request = self.http.post(self.config.url("/api/gallery/upload")).multipart(form);
        let response = self.send(request).await?;
        let body = response.text().await?;

        serde_json::from_str(&body)
            .map_err(|e| ClientError::InvalidResponse(format!("unexpected upload response: {}", e)))
    }

    /// Read a file from disk and upload it
    pub async fn upload_file(
        &self,
        path: impl AsRef<Path>,
        custom_name: Option<&str>,
    ) -> Result<UploadResult> {
        let mut upload = UploadRequest::from_path(path).await?;
        upload.custom_name = custom_name.map(str::to_string);
        self.upload_image(&upload).await
    }

    /// Download an object
    #[instrument(skip(self))]
    pub async fn download_image(&self, key: &str) -> Result<DownloadedImage> {
        let request = self
            .http
            .get(self.config.url("/api/gallery/download"))
            .query(&[("key", key)]);
        let response = self.send(request).await?;

        let headers = response.headers();
        let content_type = header_string(headers, header::CONTENT_TYPE);
        let file_name = header_string(headers, header::CONTENT_DISPOSITION)
            .as_deref()
            .and_then(parse_attachment_filename);

        let data = response.bytes().await?;

        Ok(DownloadedImage {
            key: key.to_string(),
            file_name,
            content_type,
            data,
        })
    }

    /// Delete an object
    #[instrument(skip(self))]
    pub async fn delete_image(&self, key: &str) -> Result<()> {
        let request = self
            .http
            .delete(self.config.url("/api/gallery/delete"))
            .query(&[("key", key)]);
        self.send(request).await?;
        Ok(())
    }

    /// Download link for a key, as used for thumbnails
    pub fn download_url(&self, key: &str) -> String {
        format!(
            "{}?key={}",
            self.config.url("/api/gallery/download"),
            urlencoding::encode(key)
        )
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        debug!(?request, "Sending gateway request");
        let response = request.send().await?;

        // Check for errors
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ClientError::from_body(&text, status.as_u16()));
        }

        Ok(response)
    }
}

fn header_string(headers: &header::HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
