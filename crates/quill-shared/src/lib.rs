//! # Quill Shared
//!
//! Wire types for the HTTP API, shared by the server and any Rust client.

pub mod dto;
pub mod response;

pub use response::{ErrorResponse, MessageResponse};
