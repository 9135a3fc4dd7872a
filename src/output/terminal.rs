//! Terminal renderer: styled flowing text grouped by author.

use colored::Colorize;

use crate::models::{AuthorDigest, DigestReport};
use crate::output::OutputRenderer;

/// Terminal output renderer with colored, flowing text.
pub struct TerminalRenderer;

impl OutputRenderer for TerminalRenderer {
    fn render(&self, report: &DigestReport) -> String {
        let mut output = format!(
            " {} {} on {}\n\n",
            "Digest".bold(),
            report.repo.bold(),
            report.date
        );

        if report.dev_digests.is_empty() {
            output.push_str(&format!("{}", "  ✔ No activity in this window.\n".green()));
            return output;
        }

        for dev in &report.dev_digests {
            render_author(&mut output, dev);
            output.push('\n');
        }

        output.push_str(&format!("{}\n", "───────────────────────────────────".dimmed()));
        let todos: usize = report.dev_digests.iter().map(AuthorDigest::todo_count).sum();
        output.push_str(&format!(
            " {} merged, {} {}, {} {}, {} {}\n",
            report.total_merged.to_string().bold(),
            report.total_commits.to_string().bold(),
            if report.total_commits == 1 { "commit" } else { "commits" },
            report.dev_count.to_string().bold(),
            if report.dev_count == 1 { "author" } else { "authors" },
            todos.to_string().yellow().bold(),
            if todos == 1 { "marker" } else { "markers" },
        ));
        output
    }
}

fn render_author(output: &mut String, dev: &AuthorDigest) {
    output.push_str(&format!(" {} {}\n", "●".cyan().bold(), format!("@{}", dev.author).bold()));

    for cr in &dev.change_requests {
        output.push_str(&format!(
            "   {} #{} {} {}\n",
            "⇡".green(),
            cr.number,
            cr.title,
            cr.html_url.dimmed()
        ));
        for todo in &cr.todos {
            let location = match todo.new_line {
                Some(line) => format!("{}:{}", todo.filename, line),
                None => todo.filename.clone(),
            };
            output.push_str(&format!(
                "     {} {} in {}: {}\n",
                "⚠".yellow().bold(),
                todo.kind.to_string().yellow().bold(),
                location.bold(),
                todo.text
            ));
        }
    }

    for commit in &dev.commits {
        let subject = commit.message.lines().next().unwrap_or_default();
        output.push_str(&format!(
            "   {} {} {}\n",
            "•".dimmed(),
            short_sha(&commit.sha).cyan(),
            subject
        ));
    }

    for failure in &dev.failures {
        let place = [failure.service.as_deref(), failure.endpoint.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        output.push_str(&format!(
            "   {} {} {}{}\n",
            "✖".red().bold(),
            short_sha(&failure.commit_sha).cyan(),
            failure.message,
            if place.is_empty() { String::new() } else { format!(" ({place})") }
        ));
    }
}

fn short_sha(sha: &str) -> &str {
    sha.get(..7).unwrap_or(sha)
}
