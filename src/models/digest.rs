//! Per-author digests, stored snapshots, and run reports.

use serde::{Deserialize, Serialize};

use super::annotation::TodoAnnotation;
use super::date::DigestDate;
use super::failure::AttributedFailure;

/// A merged change-request as it appears in a digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedChangeRequest {
    pub number: u64,
    pub title: String,
    pub merged_at: Option<String>,
    pub html_url: String,
    pub todos: Vec<TodoAnnotation>,
}

/// A commit as it appears in a digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DigestCommit {
    pub sha: String,
    pub message: String,
    pub html_url: String,
}

/// All activity attributed to one author key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorDigest {
    pub author: String,
    #[serde(rename = "prs")]
    pub change_requests: Vec<AnnotatedChangeRequest>,
    pub commits: Vec<DigestCommit>,
    pub failures: Vec<AttributedFailure>,
}

impl AuthorDigest {
    pub fn new(author: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            change_requests: Vec::new(),
            commits: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Total annotations across this author's change-requests.
    pub fn todo_count(&self) -> usize {
        self.change_requests.iter().map(|cr| cr.todos.len()).sum()
    }
}

/// The persisted digest for one `(owner, repo, date)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DigestSnapshot {
    pub date: DigestDate,
    /// `owner/repo`.
    pub repo: String,
    pub dev_digests: Vec<AuthorDigest>,
}

/// The result of a digest run, returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DigestReport {
    pub date: DigestDate,
    pub repo: String,
    pub total_merged: usize,
    pub total_commits: usize,
    pub dev_count: usize,
    pub dev_digests: Vec<AuthorDigest>,
}

impl DigestReport {
    /// Build a report from a snapshot and the run's totals.
    pub fn from_snapshot(
        snapshot: DigestSnapshot,
        total_merged: usize,
        total_commits: usize,
    ) -> Self {
        Self {
            date: snapshot.date,
            repo: snapshot.repo,
            total_merged,
            total_commits,
            dev_count: snapshot.dev_digests.len(),
            dev_digests: snapshot.dev_digests,
        }
    }

    /// Rebuild a report from a stored snapshot, deriving totals from its content.
    pub fn from_stored(snapshot: DigestSnapshot) -> Self {
        let total_merged = snapshot.dev_digests.iter().map(|d| d.change_requests.len()).sum();
        let total_commits = snapshot.dev_digests.iter().map(|d| d.commits.len()).sum();
        Self::from_snapshot(snapshot, total_merged, total_commits)
    }
}
