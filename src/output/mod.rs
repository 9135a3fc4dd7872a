//! Output renderers for a digest report: terminal, JSON, and plain text.

pub mod json;
pub mod terminal;
pub mod text;

use crate::models::DigestReport;

/// Trait for rendering a digest report to an output format.
pub trait OutputRenderer {
    /// Render the report to a string.
    fn render(&self, report: &DigestReport) -> String;
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::models::{
        AnnotatedChangeRequest, AttributedFailure, AuthorDigest, DigestCommit, DigestReport,
        DigestSnapshot, MarkerKind, TodoAnnotation,
    };

    /// A report with one author carrying every kind of activity, one
    /// commit-only bot, and nothing else.
    pub fn report() -> DigestReport {
        let mut alice = AuthorDigest::new("alice");
        alice.change_requests.push(AnnotatedChangeRequest {
            number: 7,
            title: "Add retry budget".into(),
            merged_at: Some("2024-01-01T10:00:00Z".into()),
            html_url: "https://github.com/acme/widgets/pull/7".into(),
            todos: vec![TodoAnnotation {
                filename: "src/retry.rs".into(),
                line: " // TODO: make configurable".into(),
                text: "// TODO: make configurable".into(),
                kind: MarkerKind::Todo,
                new_line: Some(12),
            }],
        });
        alice.commits.push(DigestCommit {
            sha: "a1b2c3d4e5".into(),
            message: "Add retry budget\n\nLonger body".into(),
            html_url: "https://github.com/acme/widgets/commit/a1b2c3d4e5".into(),
        });
        alice.failures.push(AttributedFailure {
            commit_sha: "a1b2c3d4e5".into(),
            message: "connection reset".into(),
            endpoint: Some("/api/orders".into()),
            service: Some("orders".into()),
            at: "2024-01-01T11:00:00.000Z".into(),
        });

        let mut bot = AuthorDigest::new("bot:dependabot[bot]");
        bot.commits.push(DigestCommit {
            sha: "ffff0000".into(),
            message: "Bump serde".into(),
            html_url: "https://github.com/acme/widgets/commit/ffff0000".into(),
        });

        DigestReport::from_stored(DigestSnapshot {
            date: "2024-01-01".parse().expect("valid date"),
            repo: "acme/widgets".into(),
            dev_digests: vec![alice, bot],
        })
    }
}
