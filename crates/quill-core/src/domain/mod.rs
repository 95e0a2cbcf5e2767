//! Domain entities - the core business objects.

mod document;
mod post;

pub use document::PostDocument;
pub use post::Post;
