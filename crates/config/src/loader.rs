//! Layered settings loader.
//!
//! Responsibilities:
//! - Load settings from the config file, environment variables and explicit
//!   overrides, in that order of increasing priority.
//! - Provide `env_var_or_none` for empty/whitespace-safe env reads.
//!
//! Does NOT handle:
//! - Command-line parsing (the CLI feeds its flags in as overrides).
//! - Provider queries or caching.
//!
//! Invariants:
//! - Empty or whitespace-only environment variables are treated as unset.
//! - A missing config file at the *default* path is not an error; a missing
//!   file at an explicitly requested path is.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::paths;
use crate::types::{Account, DEFAULT_MAX_CONCURRENCY, DEFAULT_TIMEOUT_SECS, Settings};

/// Errors produced while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Platform project directories could not be determined.
    #[error("can't determine the project directories for fleet-ssh")]
    NoProjectDirs,

    /// Config file could not be read.
    #[error("can't read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file could not be parsed.
    #[error("can't parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// An environment variable or flag held an unusable value.
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Read an environment variable, returning `None` if unset, empty, or
/// whitespace-only. The returned value is trimmed.
pub fn env_var_or_none(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == s.len() {
            Some(s)
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// On-disk config file shape.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    endpoint: Option<String>,
    api_token: Option<SecretString>,
    cache_dir: Option<PathBuf>,
    timeout_seconds: Option<u64>,
    max_concurrency: Option<usize>,
    accounts: Vec<Account>,
}

/// Builder that layers configuration sources into [`Settings`].
///
/// Priority, lowest to highest: defaults, config file, environment
/// variables, explicit `with_*` overrides (fed from CLI flags).
#[derive(Debug, Default)]
pub struct SettingsLoader {
    config_path: Option<PathBuf>,
    endpoint: Option<String>,
    api_token: Option<SecretString>,
    cache_dir: Option<PathBuf>,
    timeout: Option<Duration>,
    max_concurrency: Option<usize>,
    no_account_prefix: bool,
    accounts: Vec<Account>,
    account_filter: Vec<String>,
}

impl SettingsLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom config file path instead of the default location.
    pub fn with_config_path(mut self, path: PathBuf) -> Self {
        self.config_path = Some(path);
        self
    }

    pub fn with_endpoint(mut self, endpoint: String) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    pub fn with_api_token(mut self, token: String) -> Self {
        self.api_token = Some(SecretString::new(token.into()));
        self
    }

    pub fn with_cache_dir(mut self, dir: PathBuf) -> Self {
        self.cache_dir = Some(dir);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_no_account_prefix(mut self, suppress: bool) -> Self {
        self.no_account_prefix = suppress;
        self
    }

    /// Restrict the run to the named accounts. Names not present in the
    /// config file are queried as bare accounts without a domain.
    pub fn with_account_filter(mut self, names: Vec<String>) -> Self {
        self.account_filter = names
            .into_iter()
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .collect();
        self
    }

    /// Load the config file. A missing file at the default path is treated
    /// as an empty config; a missing file at an explicit path is an error.
    pub fn from_file(mut self) -> Result<Self, ConfigError> {
        let (path, required) = match self.config_path.clone() {
            Some(path) => (path, true),
            None => (paths::default_config_path()?, false),
        };

        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(source) if source.kind() == std::io::ErrorKind::NotFound && !required => {
                debug!(path = %path.display(), "no config file, using defaults");
                return Ok(self);
            }
            Err(source) => return Err(ConfigError::Io { path, source }),
        };

        let file: ConfigFile =
            serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse { path, source })?;

        if self.endpoint.is_none() {
            self.endpoint = file.endpoint;
        }
        if self.api_token.is_none() {
            self.api_token = file.api_token;
        }
        if self.cache_dir.is_none() {
            self.cache_dir = file.cache_dir;
        }
        if self.timeout.is_none() {
            self.timeout = file.timeout_seconds.map(Duration::from_secs);
        }
        if self.max_concurrency.is_none() {
            self.max_concurrency = file.max_concurrency;
        }
        self.accounts = file.accounts;
        Ok(self)
    }

    /// Apply environment variables. These override file settings but not
    /// explicit `with_*` overrides applied afterwards.
    pub fn from_env(mut self) -> Result<Self, ConfigError> {
        if let Some(endpoint) = env_var_or_none("FLEET_SSH_ENDPOINT") {
            self.endpoint = Some(endpoint);
        }
        if let Some(token) = env_var_or_none("FLEET_SSH_API_TOKEN") {
            self.api_token = Some(SecretString::new(token.into()));
        }
        if let Some(dir) = env_var_or_none("FLEET_SSH_CACHE_DIR") {
            self.cache_dir = Some(PathBuf::from(dir));
        }
        if let Some(timeout) = env_var_or_none("FLEET_SSH_TIMEOUT") {
            let secs: u64 = timeout.parse().map_err(|_| ConfigError::InvalidValue {
                key: "FLEET_SSH_TIMEOUT".to_string(),
                value: timeout,
            })?;
            self.timeout = Some(Duration::from_secs(secs));
        }
        if let Some(names) = env_var_or_none("FLEET_SSH_ACCOUNTS") {
            self.account_filter = names
                .split(',')
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty())
                .collect();
        }
        Ok(self)
    }

    /// Consume the loader and produce the final [`Settings`].
    pub fn build(self) -> Result<Settings, ConfigError> {
        let cache_dir = match self.cache_dir {
            Some(dir) => dir,
            None => paths::default_cache_dir()?,
        };

        let accounts = if self.account_filter.is_empty() {
            self.accounts
        } else {
            self.account_filter
                .iter()
                .map(|name| {
                    self.accounts
                        .iter()
                        .find(|a| a.name == *name)
                        .cloned()
                        .unwrap_or_else(|| Account::named(name.clone()))
                })
                .collect()
        };

        Ok(Settings {
            endpoint: self.endpoint,
            api_token: self.api_token,
            cache_dir,
            timeout: self
                .timeout
                .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            max_concurrency: self.max_concurrency.unwrap_or(DEFAULT_MAX_CONCURRENCY),
            no_account_prefix: self.no_account_prefix,
            accounts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(dir: &tempfile::TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("config.yaml");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_accounts_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            "endpoint: https://inventory.example\naccounts:\n  - name: prod\n    domain: corp.example\n  - name: staging\n",
        );

        let settings = SettingsLoader::new()
            .with_config_path(path)
            .from_file()
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(settings.endpoint.as_deref(), Some("https://inventory.example"));
        assert_eq!(settings.accounts.len(), 2);
        assert_eq!(settings.accounts[0].name, "prod");
        assert_eq!(settings.accounts[0].domain.as_deref(), Some("corp.example"));
        assert_eq!(settings.accounts[1].domain, None);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.yaml");

        let err = SettingsLoader::new()
            .with_config_path(missing)
            .from_file()
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn account_filter_keeps_configured_domains_and_adds_bare_accounts() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            "accounts:\n  - name: prod\n    domain: corp.example\n",
        );

        let settings = SettingsLoader::new()
            .with_config_path(path)
            .from_file()
            .unwrap()
            .with_account_filter(vec!["prod".to_string(), "sandbox".to_string()])
            .build()
            .unwrap();

        assert_eq!(settings.accounts.len(), 2);
        assert_eq!(settings.accounts[0].domain.as_deref(), Some("corp.example"));
        assert_eq!(settings.accounts[1].name, "sandbox");
        assert_eq!(settings.accounts[1].domain, None);
    }

    #[test]
    fn overrides_beat_file_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "endpoint: https://from-file.example\n");

        let settings = SettingsLoader::new()
            .with_endpoint("https://from-flag.example".to_string())
            .with_config_path(path)
            .from_file()
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(settings.endpoint.as_deref(), Some("https://from-flag.example"));
    }

    #[test]
    fn env_var_or_none_filters_blank_values() {
        // SAFETY: test-local variable name, no concurrent reader.
        unsafe {
            std::env::set_var("FLEET_SSH_TEST_BLANK", "   ");
            std::env::set_var("FLEET_SSH_TEST_SET", "  value  ");
        }
        assert_eq!(env_var_or_none("FLEET_SSH_TEST_BLANK"), None);
        assert_eq!(env_var_or_none("FLEET_SSH_TEST_SET").as_deref(), Some("value"));
        assert_eq!(env_var_or_none("FLEET_SSH_TEST_UNSET"), None);
    }

    #[test]
    fn defaults_apply_without_any_source() {
        let settings = SettingsLoader::new().build().unwrap();
        assert_eq!(settings.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(settings.max_concurrency, DEFAULT_MAX_CONCURRENCY);
        assert!(settings.accounts.is_empty());
        assert!(!settings.no_account_prefix);
    }
}
