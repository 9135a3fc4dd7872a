//! Integration tests for the track-error, preview, and store CLI commands.
//!
//! These tests exercise the library functions that back each command,
//! using the public API from the devdigest crate.

use std::sync::Arc;

use devdigest::config::Config;
use devdigest::env::Env;
use devdigest::fetch::FetchOptions;
use devdigest::models::{DigestDate, DigestReport, DigestSnapshot, RepoRef};
use devdigest::output::OutputRenderer;
use devdigest::output::text::TextRenderer;
use devdigest::pipeline::{DigestPipeline, FailureReport, PreviewRequest};
use devdigest::source::github::GithubConnector;
use devdigest::store::{FileStore, KvStore};

fn file_pipeline(dir: &std::path::Path) -> DigestPipeline {
    let connector = Arc::new(GithubConnector {
        api_url: "http://127.0.0.1:9".into(),
        user_agent: "devdigest-tests".into(),
    });
    DigestPipeline::new(connector, Arc::new(FileStore::new(dir)), FetchOptions::default())
}

fn report(owner: &str, sha: &str, message: &str) -> FailureReport {
    FailureReport {
        owner: owner.into(),
        repo: "widgets".into(),
        commit_sha: sha.into(),
        message: message.into(),
        date: Some("2024-01-01".into()),
        endpoint: None,
        service: Some("billing".into()),
    }
}

// ---------------------------------------------------------------------------
// track-error
// ---------------------------------------------------------------------------

#[tokio::test]
async fn track_error_appends_to_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = file_pipeline(dir.path());

    assert_eq!(pipeline.record_failure(report("acme", "abc", "first")).await.unwrap().count, 1);
    assert_eq!(pipeline.record_failure(report("acme", "abc", "second")).await.unwrap().count, 2);
    assert_eq!(pipeline.record_failure(report("acme", "def", "other")).await.unwrap().count, 1);

    let store = FileStore::new(dir.path());
    let stored = store
        .get("errors", "acme/widgets:2024-01-01:abc")
        .await
        .unwrap()
        .unwrap();
    let messages: Vec<_> = stored
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["message"].as_str().unwrap())
        .collect();
    assert_eq!(messages, vec!["first", "second"]);
    assert_eq!(stored[0]["service"], "billing");
}

#[tokio::test]
async fn track_error_rejects_missing_fields() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = file_pipeline(dir.path());
    let err = pipeline
        .record_failure(report("", "abc", "boom"))
        .await
        .unwrap_err();
    assert!(err.is_client_error());
    assert_eq!(err.public_message(), "owner is required");
    assert_eq!(FileStore::new(dir.path()).stats(None).unwrap().entries, 0);
}

// ---------------------------------------------------------------------------
// preview
// ---------------------------------------------------------------------------

#[tokio::test]
async fn preview_reads_stored_snapshot_and_renders_text() {
    let dir = tempfile::tempdir().unwrap();
    let date: DigestDate = "2024-01-01".parse().unwrap();
    let snapshot = DigestSnapshot {
        date,
        repo: "acme/widgets".into(),
        dev_digests: vec![devdigest::models::AuthorDigest::new("alice")],
    };
    devdigest::digest::DigestStore::new(Arc::new(FileStore::new(dir.path())))
        .save(&RepoRef::new("acme", "widgets"), &date, &snapshot)
        .await
        .unwrap();

    let found = file_pipeline(dir.path())
        .preview(PreviewRequest {
            owner: "acme".into(),
            repo: "widgets".into(),
            date: "2024-01-01".into(),
        })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found, snapshot);

    let text = TextRenderer.render(&DigestReport::from_stored(found));
    assert_eq!(text, "Digest for @alice on 2024-01-01 (acme/widgets)\n\nNo merged PRs.\n");
}

#[tokio::test]
async fn preview_rejects_malformed_date() {
    let dir = tempfile::tempdir().unwrap();
    let err = file_pipeline(dir.path())
        .preview(PreviewRequest {
            owner: "acme".into(),
            repo: "widgets".into(),
            date: "Jan 1".into(),
        })
        .await
        .unwrap_err();
    assert!(err.is_client_error());
}

// ---------------------------------------------------------------------------
// store
// ---------------------------------------------------------------------------

#[tokio::test]
async fn store_stats_and_clear_by_group() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = file_pipeline(dir.path());
    pipeline.record_failure(report("acme", "a", "x")).await.unwrap();
    pipeline.record_failure(report("acme", "b", "y")).await.unwrap();
    let store = FileStore::new(dir.path());
    store
        .set("digest", "acme/widgets:2024-01-01", serde_json::json!({}))
        .await
        .unwrap();

    let stats = store.stats(None).unwrap();
    assert_eq!(stats.entries, 3);
    assert!(stats.total_bytes > 0);
    assert!(stats.human_size().ends_with('B'));

    let cleared = store.clear(Some("errors")).unwrap();
    assert_eq!(cleared.entries, 2);
    assert_eq!(store.stats(Some("errors")).unwrap().entries, 0);
    assert_eq!(store.stats(Some("digest")).unwrap().entries, 1);

    store.clear(None).unwrap();
    assert_eq!(store.stats(None).unwrap().entries, 0);
}

#[test]
fn store_path_follows_config() {
    let dir = tempfile::tempdir().unwrap();
    let env = Env::mock([("DEVDIGEST_STORE_DIR", dir.path().to_str().unwrap())]);
    let config = Config::load(None, &env).unwrap();
    let store = FileStore::new(config.store_dir().unwrap());
    assert_eq!(store.path(), dir.path());
}
