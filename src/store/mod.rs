//! Key-value persistence used for digest snapshots and failure journals.
//!
//! Values are grouped (`digest`, `errors`, ...) and addressed by string key.
//! Single-key operations are atomic; there are no cross-key transactions.

pub mod file;
pub mod memory;

use async_trait::async_trait;
use thiserror::Error;

pub use file::{FileStore, StoreStats};
pub use memory::MemoryStore;

/// Errors from a key-value backend.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("storage I/O failed for {group}/{key}: {source}")]
    Io {
        group: String,
        key: String,
        source: std::io::Error,
    },

    #[error("stored value for {group}/{key} is malformed: {source}")]
    Malformed {
        group: String,
        key: String,
        source: serde_json::Error,
    },
}

/// A grouped key-value store holding JSON values.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Read the value at `(group, key)`, or `None` if nothing was stored.
    async fn get(&self, group: &str, key: &str) -> Result<Option<serde_json::Value>, StoreError>;

    /// Write `value` at `(group, key)`, replacing any previous value.
    async fn set(&self, group: &str, key: &str, value: serde_json::Value) -> Result<(), StoreError>;
}
