//! Author identity resolution and normalisation.
//!
//! Precedence for a commit's author: source-host login, then the name in
//! the commit metadata, then [`UNKNOWN_AUTHOR`]. Automated accounts
//! (logins ending in [`BOT_SUFFIX`]) are keyed as `bot:<login>`.

/// Identity used when no login or name is available.
pub const UNKNOWN_AUTHOR: &str = "unknown";

/// Login suffix the source host gives automated accounts.
pub const BOT_SUFFIX: &str = "[bot]";

/// Prefix distinguishing bot author keys from human ones.
pub const BOT_PREFIX: &str = "bot:";

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

/// Resolve a commit author: login, then metadata name, then `"unknown"`.
pub fn resolve_commit_author(login: Option<&str>, metadata_name: Option<&str>) -> String {
    non_empty(login)
        .or_else(|| non_empty(metadata_name))
        .unwrap_or(UNKNOWN_AUTHOR)
        .to_string()
}

/// Resolve a change-request author: login, then `"unknown"`.
pub fn resolve_change_request_author(login: Option<&str>) -> String {
    non_empty(login).unwrap_or(UNKNOWN_AUTHOR).to_string()
}

/// Normalise an identity into its author key.
///
/// Idempotent: an already-prefixed key is returned unchanged.
pub fn author_key(identity: &str) -> String {
    if identity.ends_with(BOT_SUFFIX) && !identity.starts_with(BOT_PREFIX) {
        format!("{BOT_PREFIX}{identity}")
    } else {
        identity.to_string()
    }
}
