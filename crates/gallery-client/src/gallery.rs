//! Gallery session: the client plus the view it keeps current

use crate::{ClientError, GalleryClient, GalleryView, Result, UploadRequest, UploadResult};
use tracing::{info, instrument};

/// Gallery browsing session
///
/// Every successful mutation re-fetches the listing so the view reflects the
/// store.
pub struct Gallery {
    client: GalleryClient,
    view: GalleryView,
    selected: Option<UploadRequest>,
    custom_name: String,
}

impl Gallery {
    /// Create a session over a client
    pub fn new(client: GalleryClient) -> Self {
        Self {
            client,
            view: GalleryView::new(),
            selected: None,
            custom_name: String::new(),
        }
    }

    /// Underlying client
    pub fn client(&self) -> &GalleryClient {
        &self.client
    }

    /// Current view
    pub fn view(&self) -> &GalleryView {
        &self.view
    }

    /// Mutable view, for search, filter and sort changes
    pub fn view_mut(&mut self) -> &mut GalleryView {
        &mut self.view
    }

    /// Fetch the listing into the view
    #[instrument(skip(self))]
    pub async fn refresh(&mut self) -> Result<&GalleryView> {
        let keys = self.client.list_images().await?;
        info!(count = keys.len(), "Fetched gallery listing");
        self.view.set_keys(keys);
        Ok(&self.view)
    }

    /// Choose the file for the next upload
    pub fn select_file(&mut self, upload: UploadRequest) {
        self.selected = Some(upload);
    }

    /// Name to store the next upload under; blank keeps the filename
    pub fn set_custom_name(&mut self, name: impl Into<String>) {
        self.custom_name = name.into();
    }

    /// Currently selected file
    pub fn selected_file(&self) -> Option<&UploadRequest> {
        self.selected.as_ref()
    }

    /// Upload the selected file, clear the selection and refresh
    pub async fn submit_upload(&mut self) -> Result<UploadResult> {
        let mut upload = self.selected.clone().ok_or(ClientError::NoFileSelected)?;
        if !self.custom_name.trim().is_empty() {
            upload.custom_name = Some(self.custom_name.clone());
        }

        let result = self.upload(upload).await?;
        self.selected = None;
        self.custom_name.clear();
        Ok(result)
    }

    /// Upload a file and refresh
    pub async fn upload(&mut self, upload: UploadRequest) -> Result<UploadResult> {
        let result = self.client.upload_image(&upload).await?;
        info!(key = ?result.key, "Uploaded file");
        self.refresh().await?;
        Ok(result)
    }

    /// Delete a key and refresh
    pub async fn delete(&mut self, key: &str) -> Result<()> {
        self.client.delete_image(key).await?;
        info!(key, "Deleted file");
        self.refresh().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn gallery_for(server: &MockServer) -> Gallery {
        Gallery::new(GalleryClient::with_endpoint(&server.uri()).unwrap())
    }

    fn listing(keys: &[&str]) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(keys)
    }

    #[tokio::test]
    async fn test_refresh_populates_view() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/gallery"))
            .respond_with(listing(&["cat.png", "dog.jpg"]))
            .mount(&server)
            .await;

        let mut gallery = gallery_for(&server).await;
        let view = gallery.refresh().await.unwrap();
        assert_eq!(view.keys(), ["cat.png", "dog.jpg"]);
    }

    #[tokio::test]
    async fn test_delete_refetches_listing() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/gallery/delete"))
            .and(query_param("key", "cat.png"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "message": "Delete success" })),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/gallery"))
            .respond_with(listing(&["dog.jpg"]))
            .expect(1)
            .mount(&server)
            .await;

        let mut gallery = gallery_for(&server).await;
        gallery.view_mut().set_keys(vec!["cat.png".into(), "dog.jpg".into()]);

        gallery.delete("cat.png").await.unwrap();
        assert_eq!(gallery.view().keys(), ["dog.jpg"]);
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_listing() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/gallery/delete"))
            .respond_with(
                ResponseTemplate::new(500)
                    .set_body_json(serde_json::json!({ "error": "Failed to delete image" })),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/gallery"))
            .respond_with(listing(&[]))
            .expect(0)
            .mount(&server)
            .await;

        let mut gallery = gallery_for(&server).await;
        gallery.view_mut().set_keys(vec!["cat.png".into()]);

        let err = gallery.delete("cat.png").await.unwrap_err();
        assert_eq!(err.to_string(), "gateway error (500): Failed to delete image");
        assert_eq!(gallery.view().keys(), ["cat.png"]);
    }

    #[tokio::test]
    async fn test_submit_without_selection() {
        let server = MockServer::start().await;
        let mut gallery = gallery_for(&server).await;

        let err = gallery.submit_upload().await.unwrap_err();
        assert!(matches!(err, ClientError::NoFileSelected));
        assert!(server.received_requests().await.unwrap_or_default().is_empty());
    }

    #[tokio::test]
    async fn test_submit_upload_uses_custom_name_and_resets() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/gallery/upload"))
            .and(body_string_contains("name=\"name\""))
            .and(body_string_contains("kitty.png"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                serde_json::json!({ "message": "Upload success", "key": "kitty.png" }),
            ))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/gallery"))
            .respond_with(listing(&["kitty.png"]))
            .expect(1)
            .mount(&server)
            .await;

        let mut gallery = gallery_for(&server).await;
        gallery.select_file(UploadRequest::new("cat.png", "meow"));
        gallery.set_custom_name("kitty.png");

        let result = gallery.submit_upload().await.unwrap();
        assert_eq!(result.key.as_deref(), Some("kitty.png"));
        assert_eq!(gallery.view().keys(), ["kitty.png"]);
        assert!(gallery.selected_file().is_none());

        let err = gallery.submit_upload().await.unwrap_err();
        assert!(matches!(err, ClientError::NoFileSelected));
    }
}
