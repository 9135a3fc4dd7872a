//! Config struct and loading logic.
//!
//! Priority (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables
//! 3. `.devdigest.toml` in the working directory
//! 4. `~/.config/devdigest/config.toml` (global defaults)
//! 5. Built-in defaults

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    ENV_API_URL, ENV_GITHUB_TOKEN, ENV_MAX_CONCURRENT, ENV_PAGE_SIZE, ENV_STORE_DIR,
    ENV_TIMEOUT_SECS, ENV_TOKEN, MAX_PAGE_SIZE,
};
use crate::env::Env;
use crate::fetch::FetchOptions;

/// Errors during config loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ParseFile {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("no store directory configured and no platform data dir; set DEVDIGEST_STORE_DIR")]
    NoStoreDir,
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    pub store: StoreConfig,
}

/// Upstream source-host configuration.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub api_url: String,
    pub token: Option<String>,
    /// Items per upstream list call, clamped to `1..=100`.
    pub page_size: u32,
    /// Concurrent per-change-request file fetches.
    pub max_concurrent: usize,
    /// Deadline for the upstream phase of a run. `0` disables it.
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl std::fmt::Debug for SourceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceConfig")
            .field("api_url", &self.api_url)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("page_size", &self.page_size)
            .field("max_concurrent", &self.max_concurrent)
            .field("timeout_secs", &self.timeout_secs)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            api_url: crate::constants::GITHUB_API_URL.to_string(),
            token: None,
            page_size: MAX_PAGE_SIZE,
            max_concurrent: 4,
            timeout_secs: 60,
            user_agent: format!("{}/{}", crate::constants::APP_NAME, crate::constants::VERSION),
        }
    }
}

impl SourceConfig {
    /// Fetcher settings derived from this config.
    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            page_size: self.page_size.clamp(1, MAX_PAGE_SIZE),
            max_concurrent: self.max_concurrent.max(1),
            timeout: (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs)),
        }
    }
}

/// Key-value store configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Store directory. Defaults to the platform data directory.
    pub dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration with proper layering.
    ///
    /// Reads from global config, working-directory config, then applies
    /// environment variable overrides.
    pub fn load(work_dir: Option<&Path>, env: &Env) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        // Layer 4: global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                let global = Self::load_file(&global_path)?;
                config.merge(global);
            }
        }

        // Layer 3: working-directory config
        if let Some(dir) = work_dir {
            let local_path = dir.join(crate::constants::CONFIG_FILENAME);
            if local_path.exists() {
                let local = Self::load_file(&local_path)?;
                config.merge(local);
            }
        }

        // Layer 2: environment variables
        config.apply_env_vars(env);

        Ok(config)
    }

    /// Load a config from a specific file.
    fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseFile {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the global config file path.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(crate::constants::CONFIG_DIR).join("config.toml"))
    }

    /// Resolve the store directory, falling back to the platform data directory.
    pub fn store_dir(&self) -> Result<PathBuf, ConfigError> {
        self.store
            .dir
            .clone()
            .or_else(crate::store::FileStore::default_dir)
            .ok_or(ConfigError::NoStoreDir)
    }

    /// Merge another config into this one (other takes precedence for non-default values).
    fn merge(&mut self, other: Config) {
        let default_source = SourceConfig::default();
        if other.source.api_url != default_source.api_url {
            self.source.api_url = other.source.api_url;
        }
        if other.source.token.is_some() {
            self.source.token = other.source.token;
        }
        if other.source.page_size != default_source.page_size {
            self.source.page_size = other.source.page_size;
        }
        if other.source.max_concurrent != default_source.max_concurrent {
            self.source.max_concurrent = other.source.max_concurrent;
        }
        if other.source.timeout_secs != default_source.timeout_secs {
            self.source.timeout_secs = other.source.timeout_secs;
        }
        if other.source.user_agent != default_source.user_agent {
            self.source.user_agent = other.source.user_agent;
        }

        if other.store.dir.is_some() {
            self.store.dir = other.store.dir;
        }
    }

    /// Apply environment variable overrides. Invalid numbers are ignored.
    fn apply_env_vars(&mut self, env: &Env) {
        if let Some(val) = env.get(ENV_API_URL) {
            self.source.api_url = val;
        }
        if let Some(token) = env.first_of(&[ENV_TOKEN, ENV_GITHUB_TOKEN]) {
            self.source.token = Some(token);
        }
        if let Some(dir) = env.get(ENV_STORE_DIR) {
            self.store.dir = Some(PathBuf::from(dir));
        }

        match env.parse::<u32>(ENV_PAGE_SIZE) {
            Some(Ok(n)) => self.source.page_size = n,
            Some(Err(raw)) => warn_invalid(ENV_PAGE_SIZE, &raw),
            None => {}
        }
        match env.parse::<usize>(ENV_MAX_CONCURRENT) {
            Some(Ok(n)) if n > 0 => self.source.max_concurrent = n,
            Some(Ok(_)) => warn_invalid(ENV_MAX_CONCURRENT, "0"),
            Some(Err(raw)) => warn_invalid(ENV_MAX_CONCURRENT, &raw),
            None => {}
        }
        match env.parse::<u64>(ENV_TIMEOUT_SECS) {
            Some(Ok(n)) => self.source.timeout_secs = n,
            Some(Err(raw)) => warn_invalid(ENV_TIMEOUT_SECS, &raw),
            None => {}
        }
    }
}

fn warn_invalid(name: &str, raw: &str) {
    tracing::warn!("ignoring invalid {name} value: {raw}");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env() -> Env {
        Env::mock(Vec::<(&str, &str)>::new())
    }

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.source.api_url, "https://api.github.com");
        assert_eq!(config.source.page_size, 100);
        assert_eq!(config.source.max_concurrent, 4);
        assert_eq!(config.source.timeout_secs, 60);
        assert!(config.source.user_agent.starts_with("devdigest/"));
        assert!(config.source.token.is_none());
        assert!(config.store.dir.is_none());
    }

    #[test]
    fn parse_toml_config() {
        let toml_str = r#"
[source]
api_url = "https://ghe.example.com/api/v3"
page_size = 50
max_concurrent = 8

[store]
dir = "/var/lib/devdigest"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.source.api_url, "https://ghe.example.com/api/v3");
        assert_eq!(config.source.page_size, 50);
        assert_eq!(config.source.max_concurrent, 8);
        assert_eq!(config.source.timeout_secs, 60);
        assert_eq!(config.store.dir, Some(PathBuf::from("/var/lib/devdigest")));
    }

    #[test]
    fn merge_overrides_non_default_values() {
        let mut base = Config::default();
        let mut other = Config::default();
        other.source.api_url = "https://ghe.example.com".into();
        other.source.token = Some("ghp_x".into());
        other.source.page_size = 10;
        other.source.max_concurrent = 1;
        other.source.timeout_secs = 5;
        other.store.dir = Some(PathBuf::from("/tmp/dd"));

        base.merge(other);

        assert_eq!(base.source.api_url, "https://ghe.example.com");
        assert_eq!(base.source.token.as_deref(), Some("ghp_x"));
        assert_eq!(base.source.page_size, 10);
        assert_eq!(base.source.max_concurrent, 1);
        assert_eq!(base.source.timeout_secs, 5);
        assert_eq!(base.store.dir, Some(PathBuf::from("/tmp/dd")));
    }

    #[test]
    fn merge_keeps_base_when_other_is_default() {
        let mut base = Config::default();
        base.source.page_size = 25;
        base.source.token = Some("keep".into());

        base.merge(Config::default());

        assert_eq!(base.source.page_size, 25);
        assert_eq!(base.source.token.as_deref(), Some("keep"));
    }

    #[test]
    fn load_file_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "not valid {{ toml").unwrap();

        let result = Config::load_file(&path);
        assert!(result.unwrap_err().to_string().contains("parse"));
    }

    #[test]
    fn load_file_not_found() {
        let result = Config::load_file(Path::new("/tmp/devdigest_not_exist_config.toml"));
        assert!(result.unwrap_err().to_string().contains("read"));
    }

    #[test]
    fn load_from_work_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(".devdigest.toml"),
            "[source]\ntimeout_secs = 15\n",
        )
        .unwrap();

        let config = Config::load(Some(dir.path()), &no_env()).unwrap();
        assert_eq!(config.source.timeout_secs, 15);
    }

    #[test]
    fn env_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(".devdigest.toml"),
            "[source]\npage_size = 20\n",
        )
        .unwrap();
        let env = Env::mock([("DEVDIGEST_PAGE_SIZE", "30"), ("DEVDIGEST_STORE_DIR", "/data/dd")]);

        let config = Config::load(Some(dir.path()), &env).unwrap();
        assert_eq!(config.source.page_size, 30);
        assert_eq!(config.store_dir().unwrap(), PathBuf::from("/data/dd"));
    }

    #[test]
    fn token_prefers_devdigest_over_github() {
        let env = Env::mock([("GITHUB_TOKEN", "gh"), ("DEVDIGEST_TOKEN", "dd")]);
        let mut config = Config::default();
        config.apply_env_vars(&env);
        assert_eq!(config.source.token.as_deref(), Some("dd"));

        let env = Env::mock([("GITHUB_TOKEN", "gh")]);
        let mut config = Config::default();
        config.apply_env_vars(&env);
        assert_eq!(config.source.token.as_deref(), Some("gh"));
    }

    #[test]
    fn invalid_env_numbers_are_ignored() {
        let env = Env::mock([
            ("DEVDIGEST_MAX_CONCURRENT", "0"),
            ("DEVDIGEST_TIMEOUT_SECS", "soon"),
            ("DEVDIGEST_PAGE_SIZE", "-1"),
        ]);
        let mut config = Config::default();
        config.apply_env_vars(&env);
        assert_eq!(config.source.max_concurrent, 4);
        assert_eq!(config.source.timeout_secs, 60);
        assert_eq!(config.source.page_size, 100);
    }

    #[test]
    fn fetch_options_clamp_and_disable_timeout() {
        let mut source = SourceConfig::default();
        source.page_size = 500;
        source.timeout_secs = 0;
        let options = source.fetch_options();
        assert_eq!(options.page_size, 100);
        assert!(options.timeout.is_none());

        source.page_size = 0;
        assert_eq!(source.fetch_options().page_size, 1);
    }

    #[test]
    fn debug_redacts_token() {
        let mut source = SourceConfig::default();
        source.token = Some("ghp_secret".into());
        let debug = format!("{source:?}");
        assert!(!debug.contains("ghp_secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
