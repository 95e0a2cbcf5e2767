//! JSON file document store.

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use quill_core::StoreError;
use quill_core::domain::PostDocument;
use quill_core::ports::DocumentStore;

use super::{decode, encode};

/// Stores the post document as a single JSON file.
///
/// Saves go through a sibling `.tmp` file which is fsynced and then renamed
/// over the target, so a crash mid-write leaves the previous document intact.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("posts.json"));
        name.push(suffix);
        self.path.with_file_name(name)
    }

    fn temp_path(&self) -> PathBuf {
        self.sibling(".tmp")
    }

    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    /// Write `content` to `temp_path`, fsync it and rename it over the document.
    async fn commit(&self, temp_path: &Path, content: &[u8]) -> Result<(), StoreError> {
        let mut file = fs::File::create(temp_path).await.map_err(|e| {
            StoreError::Write(format!("failed to create {}: {}", temp_path.display(), e))
        })?;
        file.write_all(content)
            .await
            .map_err(|e| StoreError::Write(format!("failed to write document: {}", e)))?;
        file.sync_all()
            .await
            .map_err(|e| StoreError::Write(format!("failed to fsync document: {}", e)))?;
        drop(file);

        fs::rename(temp_path, &self.path).await.map_err(|e| {
            StoreError::Write(format!("failed to commit {}: {}", self.path.display(), e))
        })
    }
}

#[async_trait]
impl DocumentStore for JsonFileStore {
    async fn load(&self) -> Result<Option<PostDocument>, StoreError> {
        match fs::read(&self.path).await {
            Ok(bytes) => decode(&bytes).map(Some),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Unavailable(format!(
                "failed to read {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    async fn save(&self, document: &PostDocument) -> Result<(), StoreError> {
        let content = encode(document)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|e| {
                StoreError::Write(format!("failed to create {}: {}", parent.display(), e))
            })?;
        }

        let temp_path = self.temp_path();
        if let Err(e) = self.commit(&temp_path, content.as_bytes()).await {
            if let Err(cleanup) = fs::remove_file(&temp_path).await {
                if cleanup.kind() != ErrorKind::NotFound {
                    tracing::warn!(
                        path = %temp_path.display(),
                        error = %cleanup,
                        "Failed to remove temp document"
                    );
                }
            }
            return Err(e);
        }

        // fsync the directory so the rename itself is durable
        if let Ok(dir) = fs::File::open(self.parent_dir()).await {
            let _ = dir.sync_all().await;
        }

        tracing::debug!(
            path = %self.path.display(),
            next_id = document.next_id,
            posts = document.posts.len(),
            "Post document saved"
        );
        Ok(())
    }

    async fn backup(&self) -> Result<(), StoreError> {
        let backup_path = self.sibling(&format!(
            ".corrupt-{}",
            chrono::Utc::now().timestamp_millis()
        ));

        match fs::rename(&self.path, &backup_path).await {
            Ok(()) => {
                tracing::warn!(backup = %backup_path.display(), "Corrupt post document moved aside");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Write(format!(
                "failed to back up {}: {}",
                self.path.display(),
                e
            ))),
        }
    }
}
