//! Shared types used across all modules.
//!
//! This module defines the core data structures for fetched activity,
//! diff annotations, failure journals, and digests. Other modules import
//! from here rather than reaching into each other's internals.

pub mod activity;
pub mod annotation;
pub mod date;
pub mod digest;
pub mod failure;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use activity::{Activity, ChangeRequest, ChangedFile, Commit};
pub use annotation::{MarkerKind, TodoAnnotation};
pub use date::{DigestDate, MergeWindow};
pub use digest::{AnnotatedChangeRequest, AuthorDigest, DigestCommit, DigestReport, DigestSnapshot};
pub use failure::{AttributedFailure, FailureEntry};

/// A repository on the source host, identified by owner and name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// Key of the digest snapshot for `date`: `owner/repo:date`.
    pub fn digest_key(&self, date: &DigestDate) -> String {
        format!("{self}:{date}")
    }

    /// Key of the failure journal for one commit: `owner/repo:date:sha`.
    pub fn failure_key(&self, date: &DigestDate, sha: &str) -> String {
        format!("{self}:{date}:{sha}")
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}
