//! Author aggregation: merges change-requests, commits, and failures into
//! one [`AuthorDigest`] per normalised author key.
//!
//! Entries keep first-seen order: change-request authors first, then
//! commit-only authors. Keys match by exact string equality.

pub mod identity;

use indexmap::IndexMap;

use crate::annotate;
use crate::models::{
    AnnotatedChangeRequest, AuthorDigest, ChangeRequest, Commit, DigestCommit, FailureEntry,
};

use identity::{author_key, resolve_change_request_author};

/// Incrementally groups activity by author key.
#[derive(Debug, Default)]
pub struct AuthorAggregator {
    by_author: IndexMap<String, AuthorDigest>,
}

impl AuthorAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&mut self, key: String) -> &mut AuthorDigest {
        self.by_author
            .entry(key)
            .or_insert_with_key(|k| AuthorDigest::new(k.clone()))
    }

    /// Append an annotated change-request under its author.
    pub fn add_change_request(
        &mut self,
        login: Option<&str>,
        change_request: AnnotatedChangeRequest,
    ) {
        let key = author_key(&resolve_change_request_author(login));
        self.entry(key).change_requests.push(change_request);
    }

    /// Append a commit and its journal failures under the commit's author.
    pub fn add_commit(&mut self, commit: &Commit, failures: Vec<FailureEntry>) {
        let key = author_key(&commit.author);
        let digest = self.entry(key);
        digest.commits.push(DigestCommit {
            sha: commit.sha.clone(),
            message: commit.message.clone(),
            html_url: commit.html_url.clone(),
        });
        digest
            .failures
            .extend(failures.into_iter().map(|f| f.attribute_to(&commit.sha)));
    }

    /// Number of distinct authors seen so far.
    pub fn len(&self) -> usize {
        self.by_author.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_author.is_empty()
    }

    /// Consume the aggregator, yielding digests in first-seen order.
    pub fn finish(self) -> Vec<AuthorDigest> {
        self.by_author.into_values().collect()
    }
}

/// Attach annotations from every changed file to a change-request.
pub fn annotate_change_request(change_request: &ChangeRequest) -> AnnotatedChangeRequest {
    AnnotatedChangeRequest {
        number: change_request.number,
        title: change_request.title.clone(),
        merged_at: change_request.merged_at.clone(),
        html_url: change_request.html_url.clone(),
        todos: annotate::annotate_files(&change_request.files),
    }
}

/// Group change-requests (annotating their files), commits, and failures by author.
///
/// `failures_for` is called once per commit, in commit order, with the SHA.
pub fn aggregate<F>(
    change_requests: &[ChangeRequest],
    commits: &[Commit],
    mut failures_for: F,
) -> Vec<AuthorDigest>
where
    F: FnMut(&str) -> Vec<FailureEntry>,
{
    let mut aggregator = AuthorAggregator::new();
    for cr in change_requests {
        aggregator.add_change_request(cr.author.as_deref(), annotate_change_request(cr));
    }
    for commit in commits {
        let failures = failures_for(&commit.sha);
        aggregator.add_commit(commit, failures);
    }
    aggregator.finish()
}
