//! In-memory document store - used for tests and when no file is configured.

use async_trait::async_trait;
use tokio::sync::RwLock;

use quill_core::StoreError;
use quill_core::domain::PostDocument;
use quill_core::ports::DocumentStore;

use super::{decode, encode};

/// In-memory store holding the document as serialized JSON text.
///
/// Keeping the text rather than the struct means a corrupt document can be
/// seeded with [`InMemoryDocumentStore::with_raw`].
/// Note: Data is lost on process restart.
#[derive(Default)]
pub struct InMemoryDocumentStore {
    raw: RwLock<Option<String>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from the given stored text, parsed or not.
    pub fn with_raw(text: impl Into<String>) -> Self {
        Self {
            raw: RwLock::new(Some(text.into())),
        }
    }

    /// The stored text, if anything has been written.
    pub async fn raw(&self) -> Option<String> {
        self.raw.read().await.clone()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn load(&self) -> Result<Option<PostDocument>, StoreError> {
        let raw = self.raw.read().await;
        raw.as_deref().map(|text| decode(text.as_bytes())).transpose()
    }

    async fn save(&self, document: &PostDocument) -> Result<(), StoreError> {
        let text = encode(document)?;
        *self.raw.write().await = Some(text);
        Ok(())
    }

    async fn backup(&self) -> Result<(), StoreError> {
        if self.raw.write().await.take().is_some() {
            tracing::warn!("Corrupt in-memory document discarded");
        }
        Ok(())
    }
}
