//! In-memory object store for development and testing

use crate::{ObjectBody, ObjectStore, Result, StoreError, LIST_PAGE_SIZE};
use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use std::sync::Arc;

/// A stored object
#[derive(Clone, Debug)]
struct StoredObject {
    data: Bytes,
    content_type: String,
}

/// An in-memory object store
#[derive(Clone, Default)]
pub struct MemoryObjectStore {
    objects: Arc<DashMap<String, StoredObject>>,
}

impl MemoryObjectStore {
    /// Create a new empty memory store
    pub fn new() -> Self {
        Self {
            objects: Arc::new(DashMap::new()),
        }
    }

    /// Get the number of objects stored
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Check whether an object exists
    pub fn contains(&self, key: &str) -> bool {
        self.objects.contains_key(key)
    }

    /// Content type recorded for `key`
    pub fn content_type(&self, key: &str) -> Option<String> {
        self.objects.get(key).map(|entry| entry.content_type.clone())
    }

    /// Clear all objects
    pub fn clear(&self) {
        self.objects.clear();
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn list_keys(&self) -> Result<Vec<String>> {
        let mut keys: Vec<String> = self.objects.iter().map(|entry| entry.key().clone()).collect();
        keys.sort();

        if keys.len() > LIST_PAGE_SIZE {
            tracing::warn!(
                total = keys.len(),
                returned = LIST_PAGE_SIZE,
                "Listing truncated to the first page"
            );
            keys.truncate(LIST_PAGE_SIZE);
        }

        Ok(keys)
    }

    async fn put_object(&self, key: &str, data: Bytes, content_type: &str) -> Result<()> {
        self.objects.insert(
            key.to_string(),
            StoredObject {
                data,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn get_object(&self, key: &str) -> Result<ObjectBody> {
        let object = self
            .objects
            .get(key)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| StoreError::NotFound(key.to_string()))?;

        Ok(ObjectBody::from_bytes(object.data, Some(object.content_type)))
    }

    async fn delete_object(&self, key: &str) -> Result<()> {
        self.objects.remove(key);
        Ok(())
    }

    fn is_persistent(&self) -> bool {
        false
    }

    fn describe(&self) -> String {
        "in-memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_basic() {
        let store = MemoryObjectStore::new();

        let data = Bytes::from_static(b"\x89PNG fake image");
        store.put_object("cat.png", data.clone(), "image/png").await.unwrap();

        assert!(store.contains("cat.png"));

        let body = store.get_object("cat.png").await.unwrap();
        assert_eq!(body.content_type.as_deref(), Some("image/png"));
        assert_eq!(body.content_length, Some(data.len() as u64));
        assert_eq!(body.into_bytes().await.unwrap(), data);
    }

    #[tokio::test]
    async fn test_memory_store_not_found() {
        let store = MemoryObjectStore::new();

        let result = store.get_object("missing.png").await;
        assert!(matches!(result, Err(StoreError::NotFound(key)) if key == "missing.png"));
    }

    #[tokio::test]
    async fn test_memory_store_overwrite() {
        let store = MemoryObjectStore::new();

        store.put_object("cat.png", Bytes::from_static(b"first"), "image/png").await.unwrap();
        store.put_object("cat.png", Bytes::from_static(b"second"), "image/jpeg").await.unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.content_type("cat.png").as_deref(), Some("image/jpeg"));
        let data = store.get_object("cat.png").await.unwrap().into_bytes().await.unwrap();
        assert_eq!(data.as_ref(), b"second");
    }

    #[tokio::test]
    async fn test_memory_store_delete_is_idempotent() {
        let store = MemoryObjectStore::new();

        store.put_object("delete-me.gif", Bytes::from_static(b"gif"), "image/gif").await.unwrap();
        store.delete_object("delete-me.gif").await.unwrap();
        assert!(store.is_empty());

        // Deleting again is not an error
        store.delete_object("delete-me.gif").await.unwrap();
        store.delete_object("never-existed.gif").await.unwrap();
    }

    #[tokio::test]
    async fn test_memory_store_lists_sorted_first_page() {
        let store = MemoryObjectStore::new();

        for key in ["b.png", "a.png", "c.jpg"] {
            store.put_object(key, Bytes::new(), "image/png").await.unwrap();
        }
        assert_eq!(store.list_keys().await.unwrap(), vec!["a.png", "b.png", "c.jpg"]);

        for i in 0..LIST_PAGE_SIZE {
            store.put_object(&format!("img-{:05}.png", i), Bytes::new(), "image/png").await.unwrap();
        }
        let keys = store.list_keys().await.unwrap();
        assert_eq!(keys.len(), LIST_PAGE_SIZE);
        assert_eq!(keys[0], "a.png");
    }

    #[tokio::test]
    async fn test_memory_store_is_not_persistent() {
        let store = MemoryObjectStore::new();
        assert!(!store.is_persistent());
        assert_eq!(store.describe(), "in-memory");
    }
}
