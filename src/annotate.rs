//! Marker extraction from unified diff patches.
//!
//! Scans only added (`+`) lines of a patch for TODO, FIXME and HACK
//! markers. Removed and context lines are never inspected.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::annotation::{MarkerKind, TodoAnnotation};

static MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)todo|fixme|hack").expect("marker pattern is valid"));

/// Extract marker annotations from the added lines of `patch`.
///
/// `+++` file-header lines preceding the first hunk are skipped. When hunk
/// headers are present, each annotation carries its line number in the new
/// file. An absent or empty patch yields no annotations.
pub fn extract_annotations(patch: Option<&str>, filename: &str) -> Vec<TodoAnnotation> {
    let Some(patch) = patch else {
        return Vec::new();
    };

    let mut annotations = Vec::new();
    let mut seen_hunk = false;
    let mut new_line: Option<u32> = None;

    for line in patch.lines() {
        if line.starts_with("@@") {
            seen_hunk = true;
            new_line = parse_new_start(line);
            continue;
        }

        if let Some(content) = line.strip_prefix('+') {
            if !seen_hunk && content.starts_with("++") {
                continue;
            }
            if let Some(m) = MARKER_RE.find(content) {
                if let Some(kind) = MarkerKind::from_keyword(m.as_str()) {
                    annotations.push(TodoAnnotation {
                        filename: filename.to_string(),
                        line: content.to_string(),
                        text: content.trim().to_string(),
                        kind,
                        new_line,
                    });
                }
            }
            new_line = new_line.and_then(|n| n.checked_add(1));
        } else if line.starts_with('-') {
            // Removed lines do not advance the new-file counter.
        } else if !line.starts_with('\\') {
            new_line = new_line.and_then(|n| n.checked_add(1));
        }
    }

    annotations
}

/// Extract annotations from every file of a change-request, in file order.
pub fn annotate_files<'a, I>(files: I) -> Vec<TodoAnnotation>
where
    I: IntoIterator<Item = &'a crate::models::ChangedFile>,
{
    files
        .into_iter()
        .flat_map(|f| extract_annotations(f.patch.as_deref(), &f.filename))
        .collect()
}

/// Parse the new-file start line from `@@ -a,b +c,d @@ ...`.
fn parse_new_start(header: &str) -> Option<u32> {
    let rest = header.strip_prefix("@@ ")?;
    let end = rest.find(" @@")?;
    let new_range = rest[..end].split(' ').nth(1)?.strip_prefix('+')?;
    let start = new_range.split_once(',').map_or(new_range, |(s, _)| s);
    start.parse().ok()
}
