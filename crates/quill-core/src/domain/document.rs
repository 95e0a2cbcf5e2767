use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::Post;
use crate::error::StoreError;

/// The single persisted record: an id counter plus every post in creation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDocument {
    pub next_id: u64,
    pub posts: Vec<Post>,
}

impl Default for PostDocument {
    fn default() -> Self {
        Self {
            next_id: 1,
            posts: Vec::new(),
        }
    }
}

impl PostDocument {
    /// Append a new post under the next id and advance the counter.
    ///
    /// Fails without touching the document once the counter is exhausted.
    pub fn create(&mut self, title: String, content: String) -> Result<Post, StoreError> {
        let next_id = self
            .next_id
            .checked_add(1)
            .ok_or_else(|| StoreError::Write("post id counter exhausted".to_string()))?;
        let post = Post::new(self.next_id, title, content);
        self.posts.push(post.clone());
        self.next_id = next_id;
        Ok(post)
    }

    /// Check the id invariants: `next_id` is positive, ids are unique and
    /// every id is below `next_id`.
    pub fn validate(&self) -> Result<(), String> {
        if self.next_id == 0 {
            return Err("nextId must be positive".to_string());
        }
        let mut seen = HashSet::with_capacity(self.posts.len());
        for post in &self.posts {
            if post.id == 0 || post.id >= self.next_id {
                return Err(format!(
                    "post id {} outside 1..{}",
                    post.id, self.next_id
                ));
            }
            if !seen.insert(post.id) {
                return Err(format!("duplicate post id {}", post.id));
            }
        }
        Ok(())
    }

    pub fn find(&self, id: u64) -> Option<&Post> {
        self.posts.iter().find(|post| post.id == id)
    }

    pub fn find_mut(&mut self, id: u64) -> Option<&mut Post> {
        self.posts.iter_mut().find(|post| post.id == id)
    }

    /// Remove the post with `id`, keeping the order of the rest.
    pub fn remove(&mut self, id: u64) -> Option<Post> {
        let index = self.posts.iter().position(|post| post.id == id)?;
        Some(self.posts.remove(index))
    }
}
