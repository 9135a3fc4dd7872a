//! Dated digest snapshots in the `digest` group, keyed `owner/repo:date`.
//!
//! A save replaces any previous snapshot for the key; nothing is merged.

use std::sync::Arc;

use crate::constants::GROUP_DIGEST;
use crate::models::{DigestDate, DigestSnapshot, RepoRef};
use crate::store::{KvStore, StoreError};

/// Persists and retrieves digest snapshots.
pub struct DigestStore {
    store: Arc<dyn KvStore>,
}

impl DigestStore {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Persist `snapshot`, overwriting whatever was stored for the key.
    pub async fn save(
        &self,
        repo: &RepoRef,
        date: &DigestDate,
        snapshot: &DigestSnapshot,
    ) -> Result<(), StoreError> {
        let key = repo.digest_key(date);
        let value = serde_json::to_value(snapshot).map_err(|source| StoreError::Malformed {
            group: GROUP_DIGEST.to_string(),
            key: key.clone(),
            source,
        })?;
        self.store.set(GROUP_DIGEST, &key, value).await?;
        tracing::info!(%repo, %date, authors = snapshot.dev_digests.len(), "saved digest snapshot");
        Ok(())
    }

    /// Load the snapshot for the key, or `None` if none was ever saved.
    pub async fn load(
        &self,
        repo: &RepoRef,
        date: &DigestDate,
    ) -> Result<Option<DigestSnapshot>, StoreError> {
        let key = repo.digest_key(date);
        let Some(value) = self.store.get(GROUP_DIGEST, &key).await? else {
            return Ok(None);
        };
        serde_json::from_value(value)
            .map(Some)
            .map_err(|source| StoreError::Malformed {
                group: GROUP_DIGEST.to_string(),
                key,
                source,
            })
    }
}
