//! Filesystem-based key-value store.
//!
//! Stores each value as a JSON file at `<dir>/<group>/<sha256(key)>.json`,
//! wrapped as `{"key": ..., "value": ...}` so entries stay inspectable.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::{KvStore, StoreError};

/// Monotonic suffix for temp files so concurrent writers never share one.
static TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

#[derive(Serialize, Deserialize)]
struct StoredEntry {
    key: String,
    value: serde_json::Value,
}

/// Filesystem-backed [`KvStore`].
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The default store directory (`~/.local/share/devdigest` on Linux).
    pub fn default_dir() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join(crate::constants::CONFIG_DIR))
    }

    /// Return the store directory path.
    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// Compute statistics across all groups, or a single one.
    pub fn stats(&self, group: Option<&str>) -> Result<StoreStats, std::io::Error> {
        let mut stats = StoreStats::default();
        for dir in self.group_dirs(group)? {
            for entry in std::fs::read_dir(&dir)? {
                let entry = entry?;
                let path = entry.path();
                if path.extension().is_some_and(|e| e == "json") {
                    stats.entries += 1;
                    stats.total_bytes += entry.metadata().map(|m| m.len()).unwrap_or(0);
                }
            }
        }
        Ok(stats)
    }

    /// Remove all entries across all groups, or a single one.
    pub fn clear(&self, group: Option<&str>) -> Result<StoreStats, std::io::Error> {
        let stats = self.stats(group)?;
        for dir in self.group_dirs(group)? {
            std::fs::remove_dir_all(dir)?;
        }
        Ok(stats)
    }

    /// Existing group directories to operate on.
    fn group_dirs(&self, group: Option<&str>) -> Result<Vec<PathBuf>, std::io::Error> {
        if let Some(group) = group {
            let dir = self.dir.join(group_dir_name(group));
            return Ok(if dir.is_dir() { vec![dir] } else { Vec::new() });
        }
        if !self.dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut dirs = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                dirs.push(entry.path());
            }
        }
        Ok(dirs)
    }

    /// Get the file path for a `(group, key)` pair.
    fn key_path(&self, group: &str, key: &str) -> PathBuf {
        let mut hasher = Sha256::new();
        hasher.update(key.as_bytes());
        let name = hex::encode(hasher.finalize());
        self.dir.join(group_dir_name(group)).join(format!("{name}.json"))
    }
}

/// Group names are used as directory names; anything unusual is hashed.
fn group_dir_name(group: &str) -> String {
    let plain = !group.is_empty()
        && group
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if plain {
        group.to_string()
    } else {
        let mut hasher = Sha256::new();
        hasher.update(group.as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[async_trait]
impl KvStore for FileStore {
    async fn get(&self, group: &str, key: &str) -> Result<Option<serde_json::Value>, StoreError> {
        let path = self.key_path(group, key);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Io {
                    group: group.to_string(),
                    key: key.to_string(),
                    source,
                });
            }
        };

        let entry: StoredEntry =
            serde_json::from_str(&content).map_err(|source| StoreError::Malformed {
                group: group.to_string(),
                key: key.to_string(),
                source,
            })?;
        Ok(Some(entry.value))
    }

    async fn set(
        &self,
        group: &str,
        key: &str,
        value: serde_json::Value,
    ) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            group: group.to_string(),
            key: key.to_string(),
            source,
        };

        let path = self.key_path(group, key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }

        let entry = StoredEntry {
            key: key.to_string(),
            value,
        };
        let content = serde_json::to_vec(&entry).map_err(|source| StoreError::Malformed {
            group: group.to_string(),
            key: key.to_string(),
            source,
        })?;

        // Write-then-rename keeps readers from ever seeing a partial file.
        let tmp = path.with_extension(format!(
            "tmp-{}-{}",
            std::process::id(),
            TMP_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));
        tokio::fs::write(&tmp, content).await.map_err(io_err)?;
        if let Err(e) = tokio::fs::rename(&tmp, &path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(io_err(e));
        }
        Ok(())
    }
}

/// Statistics about the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// Number of stored entries.
    pub entries: usize,
    /// Total size in bytes.
    pub total_bytes: u64,
}

impl StoreStats {
    /// Format total_bytes as a human-readable string.
    pub fn human_size(&self) -> String {
        const KB: u64 = 1024;
        const MB: u64 = 1024 * KB;

        if self.total_bytes >= MB {
            format!("{:.1} MiB", self.total_bytes as f64 / MB as f64)
        } else if self.total_bytes >= KB {
            format!("{:.1} KiB", self.total_bytes as f64 / KB as f64)
        } else {
            format!("{} B", self.total_bytes)
        }
    }
}
