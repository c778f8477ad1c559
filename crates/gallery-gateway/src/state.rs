//! Application state

use crate::config::GatewayConfig;
use gallery_store::{MemoryObjectStore, ObjectStore, S3ObjectStore};
use std::sync::Arc;
use tracing::{info, warn};

/// Application state shared across handlers
pub struct AppState {
    /// Gateway configuration
    pub config: GatewayConfig,
    /// Object store client, configured once and shared read-only
    pub store: Arc<dyn ObjectStore>,
}

impl AppState {
    /// Create a new application state, building the store from configuration
    pub async fn new(config: GatewayConfig) -> anyhow::Result<Self> {
        let store: Arc<dyn ObjectStore> = if config.use_memory_store {
            info!("Using in-memory object store (data will not persist)");
            Arc::new(MemoryObjectStore::new())
        } else {
            Arc::new(S3ObjectStore::new(config.s3_config()).await?)
        };

        Ok(Self::with_store(config, store))
    }

    /// Create state around an existing store
    pub fn with_store(config: GatewayConfig, store: Arc<dyn ObjectStore>) -> Self {
        if store.is_persistent() {
            info!("✓ Storage: {}", store.describe());
        } else {
            warn!("⚠ Storage: {} (NOT persistent - for development only)", store.describe());
        }

        Self { config, store }
    }
}
