//! GitHub REST API source host.
//!
//! A client is constructed per digest run from the caller's credential;
//! nothing is shared between runs.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::aggregate::identity::resolve_commit_author;
use crate::models::{ChangeRequest, ChangedFile, Commit, MergeWindow, RepoRef};

use super::{HostConnector, SourceError, SourceHost};

/// Per-request connect timeout. The overall run deadline is enforced by the fetcher.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// GitHub REST client bound to one credential.
pub struct GithubClient {
    http: reqwest::Client,
    api_url: String,
    token: String,
}

impl std::fmt::Debug for GithubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubClient")
            .field("api_url", &self.api_url)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

impl GithubClient {
    /// Build a client for `api_url` authenticating with `token`.
    pub fn new(api_url: &str, token: &str, user_agent: &str) -> Result<Self, SourceError> {
        if token.trim().is_empty() {
            return Err(SourceError::Config("credential is empty".into()));
        }
        let http = reqwest::Client::builder()
            .user_agent(user_agent)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| SourceError::Config(e.to_string()))?;
        Ok(Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            token: token.trim().to_string(),
        })
    }

    fn endpoint(&self, repo: &RepoRef, tail: &str) -> String {
        format!(
            "{}/repos/{}/{}/{}",
            self.api_url, repo.owner, repo.repo, tail
        )
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, SourceError> {
        let response = self
            .http
            .get(url)
            .query(query)
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", crate::constants::GITHUB_API_VERSION)
            .send()
            .await
            .map_err(|e| SourceError::Transport(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(SourceError::Unauthorized {
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            return Err(SourceError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SourceError::Transport(e.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|e| SourceError::Decode(e.to_string()))
    }
}

/// Connects [`GithubClient`]s for one API base URL and user agent.
#[derive(Debug, Clone)]
pub struct GithubConnector {
    pub api_url: String,
    pub user_agent: String,
}

impl HostConnector for GithubConnector {
    fn connect(&self, credential: &str) -> Result<Arc<dyn SourceHost>, SourceError> {
        Ok(Arc::new(GithubClient::new(&self.api_url, credential, &self.user_agent)?))
    }
}

#[async_trait::async_trait]
impl SourceHost for GithubClient {
    async fn list_closed_change_requests(
        &self,
        repo: &RepoRef,
        page_size: u32,
    ) -> Result<Vec<ChangeRequest>, SourceError> {
        let url = self.endpoint(repo, "pulls");
        let pulls: Vec<WirePull> = self
            .get_json(
                &url,
                &[("state", "closed".into()), ("per_page", page_size.to_string())],
            )
            .await?;
        Ok(pulls.into_iter().map(ChangeRequest::from).collect())
    }

    async fn list_changed_files(
        &self,
        repo: &RepoRef,
        number: u64,
        page_size: u32,
    ) -> Result<Vec<ChangedFile>, SourceError> {
        let url = self.endpoint(repo, &format!("pulls/{number}/files"));
        let files: Vec<WireFile> = self
            .get_json(&url, &[("per_page", page_size.to_string())])
            .await?;
        Ok(files.into_iter().map(ChangedFile::from).collect())
    }

    async fn list_commits(
        &self,
        repo: &RepoRef,
        window: &MergeWindow,
        page_size: u32,
    ) -> Result<Vec<Commit>, SourceError> {
        let url = self.endpoint(repo, "commits");
        let commits: Vec<WireCommit> = self
            .get_json(
                &url,
                &[
                    ("since", window.from.clone()),
                    ("until", window.to.clone()),
                    ("per_page", page_size.to_string()),
                ],
            )
            .await?;
        Ok(commits.into_iter().map(Commit::from).collect())
    }
}

// ── Wire types ──────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct WireUser {
    login: String,
}

#[derive(Debug, Deserialize)]
struct WirePull {
    number: u64,
    #[serde(default)]
    title: String,
    merged_at: Option<String>,
    html_url: String,
    user: Option<WireUser>,
}

impl From<WirePull> for ChangeRequest {
    fn from(p: WirePull) -> Self {
        ChangeRequest {
            number: p.number,
            title: p.title,
            merged_at: p.merged_at,
            html_url: p.html_url,
            author: p.user.map(|u| u.login).filter(|l| !l.is_empty()),
            files: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireFile {
    filename: String,
    patch: Option<String>,
}

impl From<WireFile> for ChangedFile {
    fn from(f: WireFile) -> Self {
        ChangedFile {
            filename: f.filename,
            patch: f.patch,
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireSignature {
    name: Option<String>,
    date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireCommitDetail {
    #[serde(default)]
    message: String,
    author: Option<WireSignature>,
    committer: Option<WireSignature>,
}

#[derive(Debug, Deserialize)]
struct WireCommit {
    sha: String,
    html_url: String,
    commit: WireCommitDetail,
    author: Option<WireUser>,
}

impl From<WireCommit> for Commit {
    fn from(c: WireCommit) -> Self {
        let login = c.author.as_ref().map(|u| u.login.as_str());
        let name = c.commit.author.as_ref().and_then(|a| a.name.as_deref());
        let author = resolve_commit_author(login, name);
        let timestamp = c
            .commit
            .committer
            .as_ref()
            .and_then(|s| s.date.clone())
            .or_else(|| c.commit.author.as_ref().and_then(|s| s.date.clone()));
        Commit {
            sha: c.sha,
            message: c.commit.message,
            author,
            html_url: c.html_url,
            timestamp,
        }
    }
}
