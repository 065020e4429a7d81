//! Storage backend initialization

use anyhow::Result;
use lectern_core::Config;
use lectern_storage::{create_object_store, ObjectStore};
use std::sync::Arc;

/// Create the configured object store backend.
pub async fn setup_storage(config: &Config) -> Result<Arc<dyn ObjectStore>> {
    tracing::info!("Initializing object store...");
    let store = create_object_store(config)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to initialize storage backend: {}", e))?;

    tracing::info!(
        backend = %store.backend_type(),
        documents_bucket = %config.documents_bucket(),
        videos_bucket = %config.videos_bucket(),
        "Object store initialized"
    );

    Ok(store)
}
