use async_trait::async_trait;

use crate::domain::PostDocument;
use crate::error::StoreError;

/// Durable home of the single [`PostDocument`].
///
/// Implementations must make `save` atomic: once it returns, readers see
/// either the previous document or the new one in full, never a mix.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Load the persisted document.
    ///
    /// Returns `Ok(None)` when nothing has been written yet and
    /// [`StoreError::Corrupt`] when the stored bytes do not parse.
    async fn load(&self) -> Result<Option<PostDocument>, StoreError>;

    /// Replace the persisted document with `document`.
    async fn save(&self, document: &PostDocument) -> Result<(), StoreError>;

    /// Move a corrupt document aside before it gets overwritten.
    async fn backup(&self) -> Result<(), StoreError>;

    /// Overwrite the document with an empty one.
    async fn reset(&self) -> Result<(), StoreError> {
        self.save(&PostDocument::default()).await
    }
}
