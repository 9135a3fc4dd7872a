//! Plain-text renderer: one notification-ready message per author.

use crate::models::{AuthorDigest, DigestReport};
use crate::output::OutputRenderer;

/// A rendered message addressed to one author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorMessage {
    pub author: String,
    pub text: String,
}

/// Build one message per author, in digest order.
pub fn author_messages(report: &DigestReport) -> Vec<AuthorMessage> {
    report
        .dev_digests
        .iter()
        .map(|dev| AuthorMessage {
            author: dev.author.clone(),
            text: format_message(dev, report),
        })
        .collect()
}

fn format_message(dev: &AuthorDigest, report: &DigestReport) -> String {
    let header = format!("Digest for @{} on {} ({})", dev.author, report.date, report.repo);
    if dev.change_requests.is_empty() {
        return format!("{header}\n\nNo merged PRs.");
    }
    let lines: Vec<String> = dev
        .change_requests
        .iter()
        .map(|cr| format!("• #{} - {} ({})", cr.number, cr.title, cr.html_url))
        .collect();
    format!("{header}\n\n{}", lines.join("\n"))
}

/// Plain-text renderer. Messages are separated by a blank line.
pub struct TextRenderer;

impl OutputRenderer for TextRenderer {
    fn render(&self, report: &DigestReport) -> String {
        let mut output = author_messages(report)
            .into_iter()
            .map(|m| m.text)
            .collect::<Vec<_>>()
            .join("\n\n");
        output.push('\n');
        output
    }
}
