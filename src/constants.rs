//! App-wide constants.
//!
//! Centralises the tool name, config paths, environment variable names,
//! storage group names, and upstream defaults.

/// Display name of the tool (lowercase).
pub const APP_NAME: &str = "devdigest";

/// Crate version, baked in at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Local config filename (e.g. `.devdigest.toml` in the working directory).
pub const CONFIG_FILENAME: &str = ".devdigest.toml";

/// Directory name under `~/.config/` and `~/.local/share/`.
pub const CONFIG_DIR: &str = "devdigest";

// ── Upstream defaults ───────────────────────────────────────────────

/// Base URL of the GitHub REST API.
pub const GITHUB_API_URL: &str = "https://api.github.com";

/// REST API version header value.
pub const GITHUB_API_VERSION: &str = "2022-11-28";

/// Largest page the upstream API will return for a single list call.
pub const MAX_PAGE_SIZE: u32 = 100;

// ── Key-value groups ────────────────────────────────────────────────

/// Group holding dated digest snapshots, keyed `owner/repo:date`.
pub const GROUP_DIGEST: &str = "digest";

/// Group holding failure journals, keyed `owner/repo:date:sha`.
pub const GROUP_ERRORS: &str = "errors";

// ── Environment variable names ──────────────────────────────────────

pub const ENV_TOKEN: &str = "DEVDIGEST_TOKEN";
pub const ENV_GITHUB_TOKEN: &str = "GITHUB_TOKEN";
pub const ENV_API_URL: &str = "DEVDIGEST_API_URL";
pub const ENV_STORE_DIR: &str = "DEVDIGEST_STORE_DIR";
pub const ENV_MAX_CONCURRENT: &str = "DEVDIGEST_MAX_CONCURRENT";
pub const ENV_TIMEOUT_SECS: &str = "DEVDIGEST_TIMEOUT_SECS";
pub const ENV_PAGE_SIZE: &str = "DEVDIGEST_PAGE_SIZE";
pub const ENV_LOG: &str = "DEVDIGEST_LOG";
