//! S3-compatible object store backed by `aws-sdk-s3`
//!
//! Works with AWS S3 and S3-compatible services such as MinIO and Garage.
//! The client is built once at startup and shared read-only by every request.

use crate::{ObjectBody, ObjectStore, Result, StoreError};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::config::retry::RetryConfig;
use aws_sdk_s3::config::{Credentials, RequestChecksumCalculation, ResponseChecksumValidation};
use aws_sdk_s3::error::{DisplayErrorContext, SdkError};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use bytes::Bytes;
use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

/// Configuration for the S3 backend
#[derive(Clone, Debug)]
pub struct S3Config {
    /// Custom endpoint URL for S3-compatible services (e.g., MinIO, Garage)
    pub endpoint: Option<String>,
    /// Region
    pub region: String,
    /// Access key ID
    pub access_key: Option<String>,
    /// Secret access key
    pub secret_key: Option<String>,
    /// Bucket holding the gallery
    pub bucket: String,
    /// Use path-style addressing (`endpoint/bucket/key`)
    pub force_path_style: bool,
}

impl Default for S3Config {
    fn default() -> Self {
        Self {
            endpoint: None,
            region: "us-east-1".to_string(),
            access_key: None,
            secret_key: None,
            bucket: "gallery".to_string(),
            force_path_style: true,
        }
    }
}

impl S3Config {
    /// Create a config for the given bucket
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            ..Default::default()
        }
    }

    /// Set a custom endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the region
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Set static credentials
    pub fn with_credentials(
        mut self,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        self.access_key = Some(access_key.into());
        self.secret_key = Some(secret_key.into());
        self
    }
}

/// Object store for an S3-compatible endpoint
#[derive(Clone, Debug)]
pub struct S3ObjectStore {
    client: Client,
    bucket: String,
    endpoint: Option<String>,
}

impl S3ObjectStore {
    /// Create a new store from configuration
    pub async fn new(config: S3Config) -> Result<Self> {
        if config.bucket.is_empty() {
            return Err(StoreError::Configuration("bucket name is required".to_string()));
        }

        let sdk_config = Self::build_sdk_config(&config).await?;

        // No retries: a failed store call surfaces immediately.
        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(config.force_path_style)
            .retry_config(RetryConfig::disabled())
            .request_checksum_calculation(RequestChecksumCalculation::WhenRequired)
            .response_checksum_validation(ResponseChecksumValidation::WhenRequired)
            .build();

        info!(
            bucket = %config.bucket,
            endpoint = config.endpoint.as_deref().unwrap_or("aws"),
            region = %config.region,
            path_style = config.force_path_style,
            "S3 object store configured"
        );

        Ok(Self {
            client: Client::from_conf(s3_config),
            bucket: config.bucket,
            endpoint: config.endpoint,
        })
    }

    /// Wrap an already configured client
    pub fn from_client(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            endpoint: None,
        }
    }

    /// Bucket name
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn build_sdk_config(config: &S3Config) -> Result<aws_config::SdkConfig> {
        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(config.region.clone()));

        if let Some(endpoint) = &config.endpoint {
            loader = loader.endpoint_url(endpoint);
        }

        match (&config.access_key, &config.secret_key) {
            (Some(access_key), Some(secret_key)) => {
                let credentials =
                    Credentials::new(access_key, secret_key, None, None, "gallery-store");
                loader = loader.credentials_provider(credentials);
            }
            (None, None) => {
                debug!("No static credentials configured, using the default provider chain");
            }
            _ => {
                return Err(StoreError::Configuration(
                    "access key and secret key must be set together".to_string(),
                ));
            }
        }

        Ok(loader.load().await)
    }
}

fn sdk_error<E, R>(operation: &'static str, err: SdkError<E, R>) -> StoreError
where
    E: std::error::Error + Send + Sync + 'static,
    R: std::fmt::Debug,
{
    StoreError::backend(operation, DisplayErrorContext(&err).to_string())
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn list_keys(&self) -> Result<Vec<String>> {
        let output = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .send()
            .await
            .map_err(|e| sdk_error("ListObjectsV2", e))?;

        if output.is_truncated() == Some(true) {
            warn!(
                bucket = %self.bucket,
                returned = output.contents().len(),
                "Listing is truncated, only the first page is returned"
            );
        }

        Ok(output
            .contents()
            .iter()
            .filter_map(|object| object.key().map(str::to_string))
            .collect())
    }

    async fn put_object(&self, key: &str, data: Bytes, content_type: &str) -> Result<()> {
        let size = data.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .content_length(size as i64)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| sdk_error("PutObject", e))?;

        debug!(key = %key, size, "Object stored");
        Ok(())
    }

    async fn get_object(&self, key: &str) -> Result<ObjectBody> {
        let output = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(output) => output,
            Err(e) if e.as_service_error().is_some_and(|se| se.is_no_such_key()) => {
                return Err(StoreError::NotFound(key.to_string()));
            }
            Err(e) => return Err(sdk_error("GetObject", e)),
        };

        let content_type = output.content_type().map(str::to_string);
        let content_length = output.content_length().and_then(|len| u64::try_from(len).ok());

        let stream = stream::try_unfold(output.body, |mut body| async move {
            match body.try_next().await {
                Ok(Some(chunk)) => Ok(Some((chunk, body))),
                Ok(None) => Ok(None),
                Err(e) => Err(StoreError::Stream(e.to_string())),
            }
        })
        .boxed();

        Ok(ObjectBody {
            content_type,
            content_length,
            stream,
        })
    }

    async fn delete_object(&self, key: &str) -> Result<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| sdk_error("DeleteObject", e))?;
        Ok(())
    }

    fn is_persistent(&self) -> bool {
        true
    }

    fn describe(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => format!("s3 bucket '{}' at {}", self.bucket, endpoint),
            None => format!("s3 bucket '{}'", self.bucket),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use wiremock::matchers::{body_bytes, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn store_for(server: &MockServer) -> S3ObjectStore {
        let config = S3Config::new("gallery")
            .with_endpoint(server.uri())
            .with_region("us-east-1")
            .with_credentials("test-access", "test-secret");
        S3ObjectStore::new(config).await.unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = S3Config::default();
        assert_eq!(config.region, "us-east-1");
        assert!(config.force_path_style);
        assert!(config.endpoint.is_none());
    }

    #[tokio::test]
    async fn test_rejects_empty_bucket() {
        let result = S3ObjectStore::new(S3Config::new("")).await;
        assert!(matches!(result, Err(StoreError::Configuration(_))));
    }

    #[rstest]
    #[case(Some("access"), None)]
    #[case(None, Some("secret"))]
    #[tokio::test]
    async fn test_rejects_partial_credentials(
        #[case] access_key: Option<&str>,
        #[case] secret_key: Option<&str>,
    ) {
        let mut config = S3Config::new("gallery").with_endpoint("http://127.0.0.1:9");
        config.access_key = access_key.map(str::to_string);
        config.secret_key = secret_key.map(str::to_string);

        let result = S3ObjectStore::new(config).await;
        assert!(matches!(result, Err(StoreError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_list_keys_uses_path_style() {
        let server = MockServer::start().await;
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<ListBucketResult xmlns="http://s3.amazonaws.com/doc/2006-03-01/">
    <Name>gallery</Name>
    <Prefix></Prefix>
    <KeyCount>2</KeyCount>
    <MaxKeys>1000</MaxKeys>
    <IsTruncated>false</IsTruncated>
    <Contents>
        <Key>cat.png</Key>
        <Size>3</Size>
    </Contents>
    <Contents>
        <Key>dog.jpg</Key>
        <Size>5</Size>
    </Contents>
</ListBucketResult>"#;

        Mock::given(method("GET"))
            .and(path("/gallery"))
            .and(query_param("list-type", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(xml, "application/xml"))
            .expect(1)
            .mount(&server)
            .await;

        let store = store_for(&server).await;
        assert_eq!(store.list_keys().await.unwrap(), vec!["cat.png", "dog.jpg"]);
    }

    #[tokio::test]
    async fn test_put_object_sends_content_type() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/gallery/cat.png"))
            .and(header("content-type", "image/png"))
            .and(body_bytes(b"meow".to_vec()))
            .respond_with(ResponseTemplate::new(200).insert_header("ETag", "\"abc\""))
            .expect(1)
            .mount(&server)
            .await;

        let store = store_for(&server).await;
        store
            .put_object("cat.png", Bytes::from_static(b"meow"), "image/png")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_get_object_streams_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gallery/cat.png"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(b"meow".to_vec(), "image/png"))
            .mount(&server)
            .await;

        let store = store_for(&server).await;
        let body = store.get_object("cat.png").await.unwrap();
        assert_eq!(body.content_type.as_deref(), Some("image/png"));
        assert_eq!(body.content_length, Some(4));
        assert_eq!(body.into_bytes().await.unwrap().as_ref(), b"meow");
    }

    #[tokio::test]
    async fn test_get_object_not_found() {
        let server = MockServer::start().await;
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<Error>
    <Code>NoSuchKey</Code>
    <Message>The specified key does not exist.</Message>
    <Key>missing.png</Key>
    <RequestId>req-1</RequestId>
</Error>"#;
        Mock::given(method("GET"))
            .and(path("/gallery/missing.png"))
            .respond_with(ResponseTemplate::new(404).set_body_raw(xml, "application/xml"))
            .mount(&server)
            .await;

        let store = store_for(&server).await;
        let result = store.get_object("missing.png").await;
        assert!(matches!(result, Err(StoreError::NotFound(key)) if key == "missing.png"));
    }

    #[tokio::test]
    async fn test_delete_object() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/gallery/cat.png"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let store = store_for(&server).await;
        store.delete_object("cat.png").await.unwrap();
    }

    #[tokio::test]
    async fn test_server_error_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/gallery/cat.png"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let store = store_for(&server).await;
        let result = store.delete_object("cat.png").await;
        assert!(matches!(
            result,
            Err(StoreError::Backend { operation: "DeleteObject", .. })
        ));
    }

    #[tokio::test]
    async fn test_describe() {
        let server = MockServer::start().await;
        let store = store_for(&server).await;
        assert!(store.is_persistent());
        assert_eq!(store.bucket(), "gallery");
        assert!(store.describe().contains(&server.uri()));
    }
}
