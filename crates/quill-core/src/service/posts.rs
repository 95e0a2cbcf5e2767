//! Post service - load, mutate and save the post document.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::{Post, PostDocument};
use crate::error::StoreError;
use crate::ports::DocumentStore;

/// What a write does when the stored document does not parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CorruptPolicy {
    /// Move the corrupt document aside, then start from an empty one.
    #[default]
    Backup,
    /// Start from an empty document and overwrite the corrupt one.
    Overwrite,
    /// Refuse the write with [`StoreError::Corrupt`].
    Fail,
}

impl FromStr for CorruptPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "backup" => Ok(Self::Backup),
            "overwrite" => Ok(Self::Overwrite),
            "fail" => Ok(Self::Fail),
            other => Err(format!("unknown corrupt policy: {other}")),
        }
    }
}

impl fmt::Display for CorruptPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Backup => "backup",
            Self::Overwrite => "overwrite",
            Self::Fail => "fail",
        };
        f.write_str(name)
    }
}

/// CRUD operations over the post document.
///
/// Every operation is a single load -> mutate -> save pass against the
/// injected store. Writers hold `writer` for the whole pass, so two
/// overlapping writes can never both start from the same document.
pub struct PostService {
    store: Arc<dyn DocumentStore>,
    policy: CorruptPolicy,
    writer: Mutex<()>,
}

impl PostService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            policy: CorruptPolicy::default(),
            writer: Mutex::new(()),
        }
    }

    pub fn with_policy(mut self, policy: CorruptPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> CorruptPolicy {
        self.policy
    }

    /// Create a post under the next id and persist it.
    pub async fn create(&self, title: String, content: String) -> Result<Post, StoreError> {
        let _guard = self.writer.lock().await;

        let mut document = self.load_for_write().await?;
        let post = document.create(title, content)?;
        self.store.save(&document).await?;

        tracing::info!(post_id = post.id, "Post created");
        Ok(post)
    }

    /// Find a post by id. Unreadable storage reads as "not found".
    pub async fn read(&self, id: u64) -> Option<Post> {
        self.load_for_read().await?.find(id).cloned()
    }

    /// Overwrite the provided fields of a post.
    ///
    /// Returns `Ok(false)` without saving when the post does not exist or
    /// the document cannot be loaded.
    pub async fn update(
        &self,
        id: u64,
        title: Option<String>,
        content: Option<String>,
    ) -> Result<bool, StoreError> {
        let _guard = self.writer.lock().await;

        let Some(mut document) = self.load_for_read().await else {
            return Ok(false);
        };
        let Some(post) = document.find_mut(id) else {
            tracing::debug!(post_id = id, "Update skipped, post not found");
            return Ok(false);
        };
        post.apply(title, content);
        self.store.save(&document).await?;

        tracing::info!(post_id = id, "Post updated");
        Ok(true)
    }

    /// Remove a post. Returns `Ok(false)` without saving when nothing matched.
    pub async fn delete(&self, id: u64) -> Result<bool, StoreError> {
        let _guard = self.writer.lock().await;

        let Some(mut document) = self.load_for_read().await else {
            return Ok(false);
        };
        if document.remove(id).is_none() {
            tracing::debug!(post_id = id, "Delete skipped, post not found");
            return Ok(false);
        }
        self.store.save(&document).await?;

        tracing::info!(post_id = id, "Post deleted");
        Ok(true)
    }

    /// All posts in creation order. Unreadable storage reads as empty.
    pub async fn list(&self) -> Vec<Post> {
        self.load_for_read()
            .await
            .map(|document| document.posts)
            .unwrap_or_default()
    }

    /// Discard every post and restart ids at 1.
    pub async fn reset(&self) -> Result<(), StoreError> {
        let _guard = self.writer.lock().await;

        if self.policy == CorruptPolicy::Backup {
            if let Err(StoreError::Corrupt(reason)) = self.store.load().await {
                tracing::warn!(%reason, "Backing up corrupt document before reset");
                self.store.backup().await?;
            }
        }
        self.store.reset().await?;

        tracing::info!("Posts reset");
        Ok(())
    }

    async fn load_for_read(&self) -> Option<PostDocument> {
        match self.store.load().await {
            Ok(document) => document,
            Err(e) => {
                tracing::warn!(error = %e, "Could not load post document, treating as empty");
                None
            }
        }
    }

    async fn load_for_write(&self) -> Result<PostDocument, StoreError> {
        match self.store.load().await {
            Ok(document) => Ok(document.unwrap_or_default()),
            Err(StoreError::Corrupt(reason)) => match self.policy {
                CorruptPolicy::Backup => {
                    tracing::warn!(%reason, "Backing up corrupt document and starting fresh");
                    self.store.backup().await?;
                    Ok(PostDocument::default())
                }
                CorruptPolicy::Overwrite => {
                    tracing::warn!(%reason, "Overwriting corrupt document");
                    Ok(PostDocument::default())
                }
                CorruptPolicy::Fail => Err(StoreError::Corrupt(reason)),
            },
            Err(e) => Err(e),
        }
    }
}
