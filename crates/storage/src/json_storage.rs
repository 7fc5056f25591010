//! JSON file storage implementation.
//!
//! Stores each key as `<key>.json` in a data directory and keeps a small
//! per-key meta marker (revision + updated_at) under `meta/`. Values are
//! replaced atomically by writing a temp file and renaming it over the
//! target.

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};
use super::{validate_key, KeyValueStore, Result};

/// File-based key-value backend.
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    /// Create storage rooted at `root`, creating the directory layout if
    /// needed.
    pub async fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();

        fs::create_dir_all(&root).await?;
        fs::create_dir_all(root.join("meta")).await?;

        Ok(Self { root })
    }

    fn value_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }

    fn temp_path(&self, key: &str) -> PathBuf {
        self.root.join(format!(".{}.json.tmp", key))
    }

    fn meta_path(&self, key: &str) -> PathBuf {
        self.root.join("meta").join(format!("{}.meta.json", key))
    }

    /// Number of times `key` has been written; 0 when never written.
    pub async fn revision(&self, key: &str) -> Result<u64> {
        validate_key(key)?;
        match fs::read_to_string(self.meta_path(key)).await {
            Ok(s) => {
                let json: serde_json::Value = serde_json::from_str(&s)?;
                Ok(json.get("revision").and_then(|v| v.as_u64()).unwrap_or(0))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(0),
            Err(e) => Err(e.into()),
        }
    }

    /// Read and increment the per-key revision, return the new revision.
    async fn bump_revision(&self, key: &str) -> Result<u64> {
        let path = self.meta_path(key);
        // A corrupt marker restarts the count rather than failing the write.
        let mut revision = 0u64;
        if let Ok(s) = fs::read_to_string(&path).await {
            if let Ok(json) = serde_json::from_str::<serde_json::Value>(&s) {
                if let Some(v) = json.get("revision").and_then(|v| v.as_u64()) {
                    revision = v;
                }
            }
        }
        revision += 1;
        let meta = serde_json::json!({
            "revision": revision,
            "updated_at": chrono::Utc::now(),
        });
        fs::write(&path, serde_json::to_string_pretty(&meta)?.as_bytes()).await?;
        Ok(revision)
    }
}

#[async_trait::async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        validate_key(key)?;
        match fs::read(self.value_path(key)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&mut self, key: &str, value: &[u8]) -> Result<()> {
        validate_key(key)?;
        let temp = self.temp_path(key);
        fs::write(&temp, value).await?;
        fs::rename(&temp, self.value_path(key)).await?;

        // The value is durable once renamed; a stale marker is not a failed write.
        match self.bump_revision(key).await {
            Ok(revision) => debug!(key, revision, bytes = value.len(), "stored value"),
            Err(e) => warn!(key, error = %e, "stored value but failed to update revision marker"),
        }
        Ok(())
    }
}
