//! JSON-file persistence for the post collection.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::PostCollection;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access post file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("post file {path} is not a valid post collection: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Reads and rewrites the whole post collection as a single JSON document.
///
/// Clones share one writer lock, so [`PostStore::modify`] calls made through any
/// clone are serialized within this process. Other processes writing the same
/// file are not coordinated with.
#[derive(Debug, Clone)]
pub struct PostStore {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl PostStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Load every post, creating an empty collection file if none exists.
    ///
    /// Creation happens under the writer lock, so concurrent first reads and
    /// an in-flight [`PostStore::modify`] never step on each other.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or created, or is not valid JSON.
    pub async fn load(&self) -> Result<PostCollection, StoreError> {
        if self.exists().await? {
            return self.read().await;
        }

        let _guard = self.write_lock.lock().await;
        self.load_locked().await
    }

    /// Replace the stored collection with `posts`.
    ///
    /// Writes a uniquely named sibling temp file and renames it over the
    /// target, so readers never observe a half-written document.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or any filesystem step fails.
    pub async fn save(&self, posts: &PostCollection) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::io(parent, e))?;
        }

        let json = serde_json::to_string_pretty(posts).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;

        let tmp_path = self.temp_path();
        if let Err(e) = tokio::fs::write(&tmp_path, json).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(StoreError::io(&tmp_path, e));
        }
        if let Err(e) = tokio::fs::rename(&tmp_path, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(StoreError::io(&self.path, e));
        }

        debug!(path = %self.path.display(), count = posts.len(), "Saved post collection");
        Ok(())
    }

    /// Run a load-modify-save cycle under the writer lock.
    ///
    /// The collection is saved only when `f` returns `Some`; `None` means
    /// nothing changed (for example the target post does not exist).
    ///
    /// # Errors
    ///
    /// Returns an error if loading or saving fails.
    pub async fn modify<T, F>(&self, f: F) -> Result<Option<T>, StoreError>
    where
        F: FnOnce(&mut PostCollection) -> Option<T>,
    {
        let _guard = self.write_lock.lock().await;

        let mut posts = self.load_locked().await?;
        let outcome = f(&mut posts);
        if outcome.is_some() {
            self.save(&posts).await?;
        }
        Ok(outcome)
    }

    /// Load, creating the file if missing. Caller holds the writer lock.
    async fn load_locked(&self) -> Result<PostCollection, StoreError> {
        if self.exists().await? {
            return self.read().await;
        }

        info!(path = %self.path.display(), "Post file missing, creating empty collection");
        let empty = PostCollection::default();
        self.save(&empty).await?;
        Ok(empty)
    }

    async fn exists(&self) -> Result<bool, StoreError> {
        tokio::fs::try_exists(&self.path)
            .await
            .map_err(|e| StoreError::io(&self.path, e))
    }

    async fn read(&self) -> Result<PostCollection, StoreError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| StoreError::io(&self.path, e))?;

        serde_json::from_str(&raw).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })
    }

    /// `.<name>.<random hex>.tmp` next to the post file.
    fn temp_path(&self) -> PathBuf {
        let mut name = std::ffi::OsString::from(".");
        if let Some(file_name) = self.path.file_name() {
            name.push(file_name);
        }
        name.push(format!(".{}.tmp", hex::encode(rand::random::<[u8; 8]>())));
        self.path.with_file_name(name)
    }
}
