use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};

/// Rendering used for `created_at`: unpadded `y-M-d h:m am|pm` in local time.
const CREATED_AT_FORMAT: &str = "%Y-%-m-%-d %-I:%-M %P";

/// Post entity - a single blog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: u64,
    pub title: String,
    pub content: String,
    pub created_at: String,
}

impl Post {
    /// Create a new post stamped with the current local time.
    pub fn new(id: u64, title: String, content: String) -> Self {
        Self::with_timestamp(id, title, content, Local::now())
    }

    /// Create a post with an explicit creation time.
    pub fn with_timestamp<Tz>(id: u64, title: String, content: String, at: DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        Self {
            id,
            title,
            content,
            created_at: at.format(CREATED_AT_FORMAT).to_string(),
        }
    }

    /// Overwrite the provided fields, leaving absent ones untouched.
    ///
    /// `id` and `created_at` are never modified.
    pub fn apply(&mut self, title: Option<String>, content: Option<String>) {
        if let Some(title) = title {
            self.title = title;
        }
        if let Some(content) = content {
            self.content = content;
        }
    }
}
