//! Raw activity fetched from the source host for one digest window.

use serde::{Deserialize, Serialize};

/// A file touched by a change-request, with its unified diff patch.
///
/// `patch` is absent for binary files and very large diffs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangedFile {
    pub filename: String,
    pub patch: Option<String>,
}

/// A closed change-request (pull request) as fetched upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRequest {
    pub number: u64,
    pub title: String,
    /// `None` until merged.
    pub merged_at: Option<String>,
    pub html_url: String,
    /// Raw author login; `None` when the account was deleted.
    pub author: Option<String>,
    /// Changed files in upstream order. Empty until files are fetched.
    #[serde(default)]
    pub files: Vec<ChangedFile>,
}

/// A commit as fetched upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commit {
    pub sha: String,
    pub message: String,
    /// Resolved author identity: login, then metadata name, then `"unknown"`.
    pub author: String,
    pub html_url: String,
    /// Commit timestamp (RFC 3339), when upstream reported one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// Everything fetched for one digest window, in upstream order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Activity {
    /// Change-requests merged inside the window, with their files.
    pub change_requests: Vec<ChangeRequest>,
    /// Commits inside the window.
    pub commits: Vec<Commit>,
}
