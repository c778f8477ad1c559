//! Gateway configuration

use gallery_store::S3Config;
use serde::{Deserialize, Serialize};

/// Gateway server configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// S3-compatible endpoint URL (AWS when unset)
    pub s3_endpoint: Option<String>,
    /// S3 region
    pub s3_region: String,
    /// S3 access key
    pub s3_access_key: Option<String>,
    /// S3 secret key
    #[serde(skip_serializing)]
    pub s3_secret_key: Option<String>,
    /// Bucket holding the gallery
    pub s3_bucket: String,
    /// Use path-style addressing
    pub s3_force_path_style: bool,
    /// Use in-memory storage (for testing/development)
    pub use_memory_store: bool,
    /// Maximum upload request size (bytes)
    pub max_upload_size: usize,
    /// Enable CORS
    pub cors_enabled: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            s3_endpoint: None,
            s3_region: "us-east-1".to_string(),
            s3_access_key: None,
            s3_secret_key: None,
            s3_bucket: "gallery".to_string(),
            s3_force_path_style: true,
            use_memory_store: false,
            max_upload_size: 50 * 1024 * 1024, // 50 MB
            cors_enabled: true,
        }
    }
}

impl GatewayConfig {
    /// Get the bind address
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Object store settings
    pub fn s3_config(&self) -> S3Config {
        S3Config {
            endpoint: self.s3_endpoint.clone(),
            region: self.s3_region.clone(),
            access_key: self.s3_access_key.clone(),
            secret_key: self.s3_secret_key.clone(),
            bucket: self.s3_bucket.clone(),
            force_path_style: self.s3_force_path_style,
        }
    }
}
