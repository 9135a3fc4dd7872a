//! Digest pipeline: the run, preview, and record-failure entry points.
//!
//! A run validates its request before any I/O, connects a source host for
//! the caller's credential, fetches the day's activity, joins recorded
//! failures per commit, groups everything by author, and saves the
//! snapshot. The first failure aborts the run; nothing partial is saved.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;
use thiserror::Error;

use crate::aggregate::aggregate;
use crate::digest::DigestStore;
use crate::failures::FailureJournal;
use crate::fetch::{FetchError, FetchOptions, fetch_activity};
use crate::models::{DigestDate, DigestReport, DigestSnapshot, FailureEntry, RepoRef};
use crate::source::{HostConnector, SourceError};
use crate::store::{KvStore, StoreError};

/// Errors surfaced by the pipeline entry points.
#[derive(Error, Debug)]
pub enum DigestError {
    /// The request is missing a field or carries a malformed one.
    #[error("invalid request: {0}")]
    Validation(String),

    /// The source host rejected the credential or a call failed.
    #[error("upstream fetch failed: {0}")]
    Upstream(#[source] SourceError),

    #[error("storage failure: {0}")]
    Storage(#[from] StoreError),

    #[error("upstream fetch timed out after {0:?}")]
    Timeout(Duration),
}

impl DigestError {
    /// Whether the caller is at fault (as opposed to upstream or storage).
    pub fn is_client_error(&self) -> bool {
        matches!(self, DigestError::Validation(_))
    }

    /// A message safe to show the caller. Server-side detail stays in the log.
    pub fn public_message(&self) -> String {
        match self {
            DigestError::Validation(msg) => msg.clone(),
            DigestError::Timeout(_) => "digest run timed out".to_string(),
            DigestError::Upstream(_) | DigestError::Storage(_) => "digest run failed".to_string(),
        }
    }
}

impl From<FetchError> for DigestError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Source(e) => DigestError::Upstream(e),
            FetchError::TimedOut(limit) => DigestError::Timeout(limit),
            FetchError::Task(msg) => DigestError::Upstream(SourceError::Transport(msg)),
        }
    }
}

/// Input of a digest run. `date` defaults to the previous UTC day.
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RunRequest {
    pub owner: String,
    pub repo: String,
    pub credential: String,
    pub date: Option<String>,
}

impl std::fmt::Debug for RunRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunRequest")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("credential", &"[REDACTED]")
            .field("date", &self.date)
            .finish()
    }
}

/// Input of a preview: all fields required.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PreviewRequest {
    pub owner: String,
    pub repo: String,
    pub date: String,
}

/// A runtime failure reported against a commit.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FailureReport {
    pub owner: String,
    pub repo: String,
    pub commit_sha: String,
    pub message: String,
    /// Defaults to today (UTC). Only the first 10 characters are used.
    pub date: Option<String>,
    pub endpoint: Option<String>,
    pub service: Option<String>,
}

/// Acknowledgement of a recorded failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordAck {
    /// Entries now journaled for the commit.
    pub count: usize,
}

/// Source of the current time, replaceable in tests.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Wires the source host, failure journal, and digest store together.
pub struct DigestPipeline {
    connector: Arc<dyn HostConnector>,
    journal: FailureJournal,
    digests: DigestStore,
    fetch: FetchOptions,
    clock: Clock,
}

impl DigestPipeline {
    pub fn new(
        connector: Arc<dyn HostConnector>,
        store: Arc<dyn KvStore>,
        fetch: FetchOptions,
    ) -> Self {
        Self {
            connector,
            journal: FailureJournal::new(Arc::clone(&store)),
            digests: DigestStore::new(store),
            fetch,
            clock: Arc::new(Utc::now),
        }
    }

    /// Replace the wall clock used for default dates and failure timestamps.
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Build, save, and return the digest for one repository and day.
    pub async fn run(&self, request: RunRequest) -> Result<DigestReport, DigestError> {
        let repo = repo_ref(&request.owner, &request.repo)?;
        let credential = required("credential", &request.credential)?;
        let date = match non_blank(request.date.as_deref()) {
            Some(raw) => parse_date(raw)?,
            None => DigestDate::previous_day((self.clock)()),
        };

        tracing::info!(%repo, %date, "starting digest run");
        let host = self
            .connector
            .connect(credential)
            .map_err(DigestError::Upstream)?;
        let activity = fetch_activity(host, &repo, &date, &self.fetch).await?;

        let now = (self.clock)().to_rfc3339_opts(SecondsFormat::Millis, true);
        let mut journaled: HashMap<&str, Vec<FailureEntry>> = HashMap::new();
        for commit in &activity.commits {
            if journaled.contains_key(commit.sha.as_str()) {
                continue;
            }
            let mut failures = self.journal.entries(&repo, &date, &commit.sha).await?;
            if !failures.is_empty() {
                tracing::debug!(
                    sha = %commit.sha,
                    count = failures.len(),
                    "joined recorded failures"
                );
            }
            // Entries journaled without a timestamp are stamped with the run time.
            for failure in failures.iter_mut().filter(|f| f.at.trim().is_empty()) {
                failure.at.clone_from(&now);
            }
            journaled.insert(&commit.sha, failures);
        }
        let dev_digests = aggregate(&activity.change_requests, &activity.commits, |sha| {
            journaled.get(sha).cloned().unwrap_or_default()
        });

        let snapshot = DigestSnapshot {
            date,
            repo: repo.to_string(),
            dev_digests,
        };
        self.digests.save(&repo, &date, &snapshot).await?;

        Ok(DigestReport::from_snapshot(
            snapshot,
            activity.change_requests.len(),
            activity.commits.len(),
        ))
    }

    /// Return the stored snapshot for a day, if a run ever saved one.
    ///
    /// Never contacts the source host.
    pub async fn preview(
        &self,
        request: PreviewRequest,
    ) -> Result<Option<DigestSnapshot>, DigestError> {
        let repo = repo_ref(&request.owner, &request.repo)?;
        let date = parse_date(required("date", &request.date)?)?;
        Ok(self.digests.load(&repo, &date).await?)
    }

    /// Append a failure to the journal of one commit.
    pub async fn record_failure(&self, report: FailureReport) -> Result<RecordAck, DigestError> {
        let repo = repo_ref(&report.owner, &report.repo)?;
        let sha = required("commitSha", &report.commit_sha)?;
        let message = required("message", &report.message)?;

        let now = (self.clock)();
        let date = match non_blank(report.date.as_deref()) {
            Some(raw) => parse_date(truncate_chars(raw, 10))?,
            None => DigestDate::today(now),
        };

        let entry = FailureEntry {
            message: message.to_string(),
            endpoint: report.endpoint,
            service: report.service,
            at: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        };
        let count = self.journal.append(&repo, &date, sha, entry).await?;
        tracing::info!(%repo, %date, sha, count, "recorded failure");
        Ok(RecordAck { count })
    }
}

fn repo_ref(owner: &str, repo: &str) -> Result<RepoRef, DigestError> {
    Ok(RepoRef::new(required("owner", owner)?, required("repo", repo)?))
}

fn required<'a>(field: &str, value: &'a str) -> Result<&'a str, DigestError> {
    non_blank(Some(value)).ok_or_else(|| DigestError::Validation(format!("{field} is required")))
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_date(raw: &str) -> Result<DigestDate, DigestError> {
    raw.parse().map_err(DigestError::Validation)
}

fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
