//! # Quill Core
//!
//! The domain layer of Quillpost.
//! This crate contains the post model, the storage port and the post service,
//! with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use error::{DomainError, StoreError};
pub use service::{CorruptPolicy, PostService};
