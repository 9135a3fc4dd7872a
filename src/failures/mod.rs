//! Failure journal: append-only lists of runtime failures keyed by
//! `(owner, repo, date, commit sha)` in the `errors` group.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::constants::GROUP_ERRORS;
use crate::models::{DigestDate, FailureEntry, RepoRef};
use crate::store::{KvStore, StoreError};

/// Reads and appends failure entries.
pub struct FailureJournal {
    store: Arc<dyn KvStore>,
    /// Serialises read-modify-write appends made through this journal.
    append_lock: Mutex<()>,
}

impl FailureJournal {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self {
            store,
            append_lock: Mutex::new(()),
        }
    }

    /// Failures recorded for one commit on one date; empty when none exist.
    pub async fn entries(
        &self,
        repo: &RepoRef,
        date: &DigestDate,
        sha: &str,
    ) -> Result<Vec<FailureEntry>, StoreError> {
        let key = repo.failure_key(date, sha);
        let Some(value) = self.store.get(GROUP_ERRORS, &key).await? else {
            return Ok(Vec::new());
        };
        serde_json::from_value(value).map_err(|source| StoreError::Malformed {
            group: GROUP_ERRORS.to_string(),
            key,
            source,
        })
    }

    /// Append one entry and return the journal's new length.
    ///
    /// Appends through the same journal never lose entries; appends from
    /// other processes sharing the store race, and the last write wins.
    pub async fn append(
        &self,
        repo: &RepoRef,
        date: &DigestDate,
        sha: &str,
        entry: FailureEntry,
    ) -> Result<usize, StoreError> {
        let _guard = self.append_lock.lock().await;

        let mut entries = self.entries(repo, date, sha).await?;
        entries.push(entry);
        let count = entries.len();

        let key = repo.failure_key(date, sha);
        let value = serde_json::to_value(&entries).map_err(|source| StoreError::Malformed {
            group: GROUP_ERRORS.to_string(),
            key: key.clone(),
            source,
        })?;
        self.store.set(GROUP_ERRORS, &key, value).await?;

        tracing::debug!(%repo, %date, sha, count, "appended failure entry");
        Ok(count)
    }
}
