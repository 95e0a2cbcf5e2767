//! Document store implementations - JSON file and in-memory.

mod file;
mod memory;

pub use file::JsonFileStore;
pub use memory::InMemoryDocumentStore;

use quill_core::StoreError;
use quill_core::domain::PostDocument;

/// Parse a stored document. Documents breaking the id invariants count as corrupt.
fn decode(bytes: &[u8]) -> Result<PostDocument, StoreError> {
    let document: PostDocument =
        serde_json::from_slice(bytes).map_err(|e| StoreError::Corrupt(e.to_string()))?;
    document.validate().map_err(StoreError::Corrupt)?;
    Ok(document)
}

fn encode(document: &PostDocument) -> Result<String, StoreError> {
    serde_json::to_string_pretty(document).map_err(|e| StoreError::Write(e.to_string()))
}
