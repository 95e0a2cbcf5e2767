//! # Quill Infrastructure
//!
//! Concrete implementations of the ports defined in `quill-core`.
//!
//! - [`JsonFileStore`] - the post document as a pretty-printed JSON file
//! - [`InMemoryDocumentStore`] - process-local store for tests and ephemeral runs

pub mod store;

pub use store::{InMemoryDocumentStore, JsonFileStore};
