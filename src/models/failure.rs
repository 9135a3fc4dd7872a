//! Failure journal entries recorded ahead of a digest run.

use serde::{Deserialize, Serialize};

fn unknown_error() -> String {
    "unknown error".to_string()
}

/// One recorded runtime failure. Entries are append-only and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureEntry {
    #[serde(default = "unknown_error")]
    pub message: String,
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub service: Option<String>,
    /// Occurrence time, RFC 3339 UTC. Empty when the writer omitted it; a
    /// digest run stamps such entries with its own time.
    #[serde(default)]
    pub at: String,
}

impl FailureEntry {
    /// Attach the originating commit SHA for inclusion in a digest.
    pub fn attribute_to(self, commit_sha: &str) -> AttributedFailure {
        AttributedFailure {
            commit_sha: commit_sha.to_string(),
            message: self.message,
            endpoint: self.endpoint,
            service: self.service,
            at: self.at,
        }
    }
}

/// A failure joined into a digest through its commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributedFailure {
    pub commit_sha: String,
    pub message: String,
    pub endpoint: Option<String>,
    pub service: Option<String>,
    pub at: String,
}
