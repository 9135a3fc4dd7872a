//! Activity fetcher: windowed retrieval of merged change-requests, their
//! changed files, and commits for one digest day.
//!
//! Per-change-request file fetches fan out under a semaphore and are
//! reassembled in the order the change-requests were listed. The whole
//! fetch runs under an optional deadline; when it expires the in-flight
//! requests are aborted.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::models::{Activity, ChangeRequest, ChangedFile, Commit, DigestDate, MergeWindow, RepoRef};
use crate::source::{SourceError, SourceHost};

/// Errors from the activity fetcher.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("fetching activity timed out after {0:?}")]
    TimedOut(Duration),

    #[error("file fetch task failed: {0}")]
    Task(String),
}

/// Knobs for one fetch.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Items requested per list call; only one page is ever read.
    pub page_size: u32,
    /// Maximum concurrent per-change-request file fetches.
    pub max_concurrent: usize,
    /// Deadline for the whole fetch. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            page_size: crate::constants::MAX_PAGE_SIZE,
            max_concurrent: 4,
            timeout: Some(Duration::from_secs(60)),
        }
    }
}

/// Fetch merged change-requests (with files) and commits for `date`.
pub async fn fetch_activity(
    host: Arc<dyn SourceHost>,
    repo: &RepoRef,
    date: &DigestDate,
    options: &FetchOptions,
) -> Result<Activity, FetchError> {
    let fetch = fetch_unbounded(host, repo, date, options);
    match options.timeout {
        Some(limit) => tokio::time::timeout(limit, fetch)
            .await
            .map_err(|_| FetchError::TimedOut(limit))?,
        None => fetch.await,
    }
}

async fn fetch_unbounded(
    host: Arc<dyn SourceHost>,
    repo: &RepoRef,
    date: &DigestDate,
    options: &FetchOptions,
) -> Result<Activity, FetchError> {
    let window = date.window();
    let page_size = options.page_size.clamp(1, crate::constants::MAX_PAGE_SIZE);

    let closed = host.list_closed_change_requests(repo, page_size).await?;
    warn_if_truncated("closed change-requests", closed.len(), page_size);
    let mut merged = merged_within(closed, &window);
    tracing::info!(%repo, %date, count = merged.len(), "found merged change-requests");

    let numbers: Vec<u64> = merged.iter().map(|cr| cr.number).collect();
    let files = fetch_files(
        Arc::clone(&host),
        repo,
        &numbers,
        page_size,
        options.max_concurrent,
    )
    .await?;
    for (cr, files) in merged.iter_mut().zip(files) {
        cr.files = files;
    }

    let commits = host.list_commits(repo, &window, page_size).await?;
    warn_if_truncated("commits", commits.len(), page_size);
    let commits = commits_within(commits, &window);
    tracing::info!(%repo, %date, count = commits.len(), "found commits");

    Ok(Activity {
        change_requests: merged,
        commits,
    })
}

/// Keep change-requests merged inside `window`, preserving order.
pub fn merged_within(
    change_requests: Vec<ChangeRequest>,
    window: &MergeWindow,
) -> Vec<ChangeRequest> {
    change_requests
        .into_iter()
        .filter(|cr| {
            let Some(merged_at) = cr.merged_at.as_deref() else {
                return false;
            };
            match window.contains(merged_at) {
                Some(inside) => inside,
                None => {
                    tracing::warn!(
                        number = cr.number,
                        merged_at,
                        "skipping change-request with unparseable merge time"
                    );
                    false
                }
            }
        })
        .collect()
}

/// Drop commits whose reported timestamp lies outside `window`.
///
/// Commits without a timestamp are kept; upstream already filtered by window.
pub fn commits_within(commits: Vec<Commit>, window: &MergeWindow) -> Vec<Commit> {
    commits
        .into_iter()
        .filter(|c| match c.timestamp.as_deref() {
            Some(ts) => window.contains(ts).unwrap_or(true),
            None => true,
        })
        .collect()
}

/// Fetch files for each change-request number, returning them in input order.
async fn fetch_files(
    host: Arc<dyn SourceHost>,
    repo: &RepoRef,
    numbers: &[u64],
    page_size: u32,
    max_concurrent: usize,
) -> Result<Vec<Vec<ChangedFile>>, FetchError> {
    let semaphore = Arc::new(Semaphore::new(max_concurrent.max(1)));
    let mut join_set = JoinSet::new();

    for (index, &number) in numbers.iter().enumerate() {
        let host = Arc::clone(&host);
        let sem = Arc::clone(&semaphore);
        let repo = repo.clone();
        join_set.spawn(async move {
            let _permit = sem
                .acquire_owned()
                .await
                .map_err(|e| FetchError::Task(e.to_string()))?;
            let files = host.list_changed_files(&repo, number, page_size).await?;
            Ok::<_, FetchError>((index, files))
        });
    }

    let mut slots: Vec<Vec<ChangedFile>> = vec![Vec::new(); numbers.len()];
    while let Some(joined) = join_set.join_next().await {
        // Returning early drops the JoinSet, which aborts the remaining tasks.
        let (index, files) = joined.map_err(|e| FetchError::Task(e.to_string()))??;
        warn_if_truncated("changed files", files.len(), page_size);
        slots[index] = files;
    }
    Ok(slots)
}

fn warn_if_truncated(what: &str, len: usize, page_size: u32) {
    if len >= page_size as usize {
        tracing::warn!(
            what,
            len,
            "upstream page is full; results beyond the first page are not fetched"
        );
    }
}
