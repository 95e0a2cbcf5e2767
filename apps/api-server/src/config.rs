//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use quill_core::CorruptPolicy;

/// Where the post document lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    File(PathBuf),
    Memory,
}

/// Storage configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub on_corrupt: CorruptPolicy,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub store: StoreConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key lookup. Invalid values fall back
    /// to their defaults with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = match lookup("PORT") {
            Some(raw) => raw.parse::<u16>().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "Invalid PORT, using 3000");
                3000
            }),
            None => 3000,
        };

        let backend = match lookup("QUILL_STORE").as_deref().map(str::to_lowercase) {
            Some(kind) if kind == "memory" => StoreBackend::Memory,
            Some(kind) if kind != "file" => {
                tracing::warn!(value = %kind, "Unknown QUILL_STORE, using file");
                Self::file_backend(&lookup)
            }
            _ => Self::file_backend(&lookup),
        };

        let on_corrupt = lookup("QUILL_ON_CORRUPT")
            .map(|raw| {
                raw.parse::<CorruptPolicy>().unwrap_or_else(|e| {
                    tracing::warn!(error = %e, "Invalid QUILL_ON_CORRUPT, using backup");
                    CorruptPolicy::default()
                })
            })
            .unwrap_or_default();

        Self {
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port,
            store: StoreConfig {
                backend,
                on_corrupt,
            },
        }
    }

    fn file_backend(lookup: &impl Fn(&str) -> Option<String>) -> StoreBackend {
        let path = lookup("POSTS_FILE").unwrap_or_else(|| "posts.json".to_string());
        StoreBackend::File(PathBuf::from(path))
    }
}
