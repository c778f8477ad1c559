//! # Gallery Store
//!
//! Object storage layer for the S3 gallery.
//!
//! This crate provides:
//! - **ObjectStore trait**: List, put, get, and delete objects by key
//! - **S3 backend**: Any S3-compatible endpoint (AWS, MinIO, Garage) via `aws-sdk-s3`
//! - **Memory backend**: Non-persistent store for development and tests
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │             Gateway Handlers            │
//! ├─────────────────────────────────────────┤
//! │           ObjectStore Trait             │
//! ├────────────────────┬────────────────────┤
//! │   S3ObjectStore    │ MemoryObjectStore  │
//! ├────────────────────┴────────────────────┤
//! │        S3-compatible object store       │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use gallery_store::{ObjectStore, S3Config, S3ObjectStore};
//!
//! let store = S3ObjectStore::new(S3Config::new("gallery")).await?;
//! store.put_object("cat.png", data, "image/png").await?;
//! let keys = store.list_keys().await?;
//! ```

pub mod error;
pub mod memory;
pub mod s3;

pub use error::{Result, StoreError};
pub use memory::MemoryObjectStore;
pub use s3::{S3Config, S3ObjectStore};

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures::stream::{BoxStream, StreamExt};

/// Content type used when an upload does not declare one
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Number of keys a single listing call returns (S3's default `max-keys`)
pub const LIST_PAGE_SIZE: usize = 1000;

/// Trait for object storage backends
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// List object keys in the bucket.
    ///
    /// Only the first page of the listing is returned.
    async fn list_keys(&self) -> Result<Vec<String>>;

    /// Create or overwrite the object stored under `key`
    async fn put_object(&self, key: &str, data: Bytes, content_type: &str) -> Result<()>;

    /// Fetch an object, streaming its content
    async fn get_object(&self, key: &str) -> Result<ObjectBody>;

    /// Delete an object. Deleting a missing key succeeds.
    async fn delete_object(&self, key: &str) -> Result<()>;

    /// Whether objects survive a process restart
    fn is_persistent(&self) -> bool;

    /// Short human-readable description for startup logs
    fn describe(&self) -> String;
}

/// Content of a fetched object
pub struct ObjectBody {
    /// MIME type recorded when the object was written
    pub content_type: Option<String>,
    /// Size in bytes, when the store reports it
    pub content_length: Option<u64>,
    /// Object content
    pub stream: BoxStream<'static, Result<Bytes>>,
}

impl ObjectBody {
    /// Create a body from an in-memory buffer
    pub fn from_bytes(data: Bytes, content_type: Option<String>) -> Self {
        Self {
            content_type,
            content_length: Some(data.len() as u64),
            stream: futures::stream::once(async move { Ok(data) }).boxed(),
        }
    }

    /// Collect the whole stream into memory
    pub async fn into_bytes(mut self) -> Result<Bytes> {
        let mut buf = BytesMut::with_capacity(self.content_length.unwrap_or(0) as usize);
        while let Some(chunk) = self.stream.next().await {
            buf.extend_from_slice(&chunk?);
        }
        Ok(buf.freeze())
    }
}

impl std::fmt::Debug for ObjectBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectBody")
            .field("content_type", &self.content_type)
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}
