//! Snapshot tests for output renderers.
//!
//! Each test renders a standard digest report through a renderer
//! and compares the output against expected fixture files.

use devdigest::models::{
    AnnotatedChangeRequest, AttributedFailure, AuthorDigest, DigestCommit, DigestReport,
    DigestSnapshot, MarkerKind, TodoAnnotation,
};
use devdigest::output::OutputRenderer;
use devdigest::output::json::JsonRenderer;
use devdigest::output::terminal::TerminalRenderer;
use devdigest::output::text::{TextRenderer, author_messages};

fn commit(sha: &str, message: &str) -> DigestCommit {
    DigestCommit {
        sha: sha.into(),
        message: message.into(),
        html_url: format!("https://github.com/acme/widgets/commit/{sha}"),
    }
}

/// Standard report used across all snapshot tests.
fn test_report() -> DigestReport {
    let mut alice = AuthorDigest::new("alice");
    alice.change_requests = vec![
        AnnotatedChangeRequest {
            number: 7,
            title: "Add retry budget".into(),
            merged_at: Some("2024-01-01T10:00:00Z".into()),
            html_url: "https://github.com/acme/widgets/pull/7".into(),
            todos: vec![
                TodoAnnotation {
                    filename: "src/retry.rs".into(),
                    line: " // TODO: make configurable".into(),
                    text: "// TODO: make configurable".into(),
                    kind: MarkerKind::Todo,
                    new_line: Some(12),
                },
                TodoAnnotation {
                    filename: "src/retry.rs".into(),
                    line: "\tlet hack = true; // HACK".into(),
                    text: "let hack = true; // HACK".into(),
                    kind: MarkerKind::Hack,
                    new_line: None,
                },
            ],
        },
        AnnotatedChangeRequest {
            number: 9,
            title: "Tidy docs".into(),
            merged_at: Some("2024-01-01T23:59:59Z".into()),
            html_url: "https://github.com/acme/widgets/pull/9".into(),
            todos: vec![],
        },
    ];
    alice.commits.push(commit("a1b2c3d4e5", "Add retry budget"));
    alice.failures.push(AttributedFailure {
        commit_sha: "a1b2c3d4e5".into(),
        message: "connection reset".into(),
        endpoint: Some("/api/orders".into()),
        service: None,
        at: "2024-01-01T11:00:00.000Z".into(),
    });

    let mut bot = AuthorDigest::new("bot:dependabot[bot]");
    bot.commits.push(commit("ffff0000", "Bump serde"));

    let mut unknown = AuthorDigest::new("unknown");
    unknown.commits.push(commit("0000aaaa", "wip"));

    DigestReport::from_stored(DigestSnapshot {
        date: "2024-01-01".parse().unwrap(),
        repo: "acme/widgets".into(),
        dev_digests: vec![alice, bot, unknown],
    })
}

#[test]
fn snapshot_json_renderer() {
    let output = JsonRenderer.render(&test_report());

    let actual: serde_json::Value = serde_json::from_str(&output).unwrap();
    let expected_str =
        std::fs::read_to_string("tests/fixtures/expected_json_output.json").unwrap();
    let expected: serde_json::Value = serde_json::from_str(&expected_str).unwrap();

    pretty_assertions::assert_eq!(actual, expected);
}

#[test]
fn snapshot_text_renderer() {
    let output = TextRenderer.render(&test_report());
    let expected = std::fs::read_to_string("tests/fixtures/expected_text_output.txt").unwrap();
    pretty_assertions::assert_eq!(output, expected);
}

#[test]
fn text_messages_are_addressed_per_author() {
    let authors: Vec<_> = author_messages(&test_report())
        .into_iter()
        .map(|m| m.author)
        .collect();
    assert_eq!(authors, vec!["alice", "bot:dependabot[bot]", "unknown"]);
}

#[test]
fn terminal_renderer_without_color() {
    colored::control::set_override(false);
    let output = TerminalRenderer.render(&test_report());
    colored::control::unset_override();

    assert!(output.contains(" Digest acme/widgets on 2024-01-01\n"));
    assert!(output.contains(" ● @alice\n"));
    assert!(output.contains("   ⇡ #7 Add retry budget https://github.com/acme/widgets/pull/7\n"));
    assert!(output.contains("     ⚠ TODO in src/retry.rs:12: // TODO: make configurable\n"));
    assert!(output.contains("     ⚠ HACK in src/retry.rs: let hack = true; // HACK\n"));
    assert!(output.contains("   • a1b2c3d Add retry budget\n"));
    assert!(output.contains("   ✖ a1b2c3d connection reset (/api/orders)\n"));
    assert!(output.contains(" 2 merged, 3 commits, 3 authors, 2 markers\n"));
}
