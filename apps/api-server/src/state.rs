//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::ports::DocumentStore;
use quill_core::{CorruptPolicy, PostService};
use quill_infra::{InMemoryDocumentStore, JsonFileStore};

use crate::config::{StoreBackend, StoreConfig};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<PostService>,
}

impl AppState {
    /// Build the application state with the configured store.
    pub fn new(config: &StoreConfig) -> Self {
        let store: Arc<dyn DocumentStore> = match &config.backend {
            StoreBackend::File(path) => {
                tracing::info!(path = %path.display(), "Using JSON file store");
                Arc::new(JsonFileStore::new(path.clone()))
            }
            StoreBackend::Memory => {
                tracing::warn!("Using in-memory store - posts are lost on restart");
                Arc::new(InMemoryDocumentStore::new())
            }
        };

        tracing::info!(on_corrupt = %config.on_corrupt, "Application state initialized");
        Self::with_store(store, config.on_corrupt)
    }

    pub fn with_store(store: Arc<dyn DocumentStore>, policy: CorruptPolicy) -> Self {
        Self {
            posts: Arc::new(PostService::new(store).with_policy(policy)),
        }
    }
}
