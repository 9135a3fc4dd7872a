//! Source-host abstraction: the read-only upstream that supplies
//! change-requests, their changed files, and commits.

pub mod github;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{ChangeRequest, ChangedFile, Commit, MergeWindow, RepoRef};

/// Errors from the source host.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("credential rejected by source host (HTTP {status})")]
    Unauthorized { status: u16 },

    #[error("source host request failed with HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("source host request failed: {0}")]
    Transport(String),

    #[error("failed to decode source host response: {0}")]
    Decode(String),

    #[error("invalid source host configuration: {0}")]
    Config(String),
}

/// Read-only access to a repository's activity.
///
/// Every list call returns at most one page of `page_size` items.
#[async_trait]
pub trait SourceHost: Send + Sync {
    /// Closed change-requests, merged or not, in upstream order.
    ///
    /// Returned items have empty `files`.
    async fn list_closed_change_requests(
        &self,
        repo: &RepoRef,
        page_size: u32,
    ) -> Result<Vec<ChangeRequest>, SourceError>;

    /// Files changed by one change-request, with their patches.
    async fn list_changed_files(
        &self,
        repo: &RepoRef,
        number: u64,
        page_size: u32,
    ) -> Result<Vec<ChangedFile>, SourceError>;

    /// Commits whose timestamp falls within `window`.
    async fn list_commits(
        &self,
        repo: &RepoRef,
        window: &MergeWindow,
        page_size: u32,
    ) -> Result<Vec<Commit>, SourceError>;
}

/// Builds a [`SourceHost`] bound to one caller-supplied credential.
///
/// A fresh host is connected for every digest run.
pub trait HostConnector: Send + Sync {
    fn connect(&self, credential: &str) -> Result<std::sync::Arc<dyn SourceHost>, SourceError>;
}
