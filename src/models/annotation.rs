//! Marker annotations found in added diff lines.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which marker keyword matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    Todo,
    Fixme,
    Hack,
}

impl MarkerKind {
    /// Classify a case-insensitive keyword match.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_lowercase().as_str() {
            "todo" => Some(Self::Todo),
            "fixme" => Some(Self::Fixme),
            "hack" => Some(Self::Hack),
            _ => None,
        }
    }
}

impl fmt::Display for MarkerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkerKind::Todo => write!(f, "TODO"),
            MarkerKind::Fixme => write!(f, "FIXME"),
            MarkerKind::Hack => write!(f, "HACK"),
        }
    }
}

/// A TODO/FIXME/HACK marker on an added line of a change-request diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoAnnotation {
    pub filename: String,
    /// The added line without its leading `+`.
    pub line: String,
    /// `line` with surrounding whitespace removed.
    pub text: String,
    pub kind: MarkerKind,
    /// 1-based line number in the new file, when hunk headers were present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_line: Option<u32>,
}
