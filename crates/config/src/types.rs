//! Core configuration types for fleet-ssh.
//!
//! Responsibilities:
//! - Define `Account` (one isolated cloud account to query).
//! - Define `Settings` (the explicit configuration structure handed to the
//!   resolver and cache, never read ad hoc from global state).
//!
//! Does NOT handle:
//! - Loading or layering (see `loader` module).
//! - Path resolution (see `paths` module).
//!
//! Invariants:
//! - `Account` is immutable once loaded; `region` is filled in by the
//!   provider query, not by configuration.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Default provider query timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default number of accounts queried concurrently.
pub const DEFAULT_MAX_CONCURRENCY: usize = 8;

/// Identity of one isolated cloud account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Account {
    /// Account name, used as the name prefix for all of its instances.
    pub name: String,
    /// Network region, reported by the provider after querying.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// DNS domain suffix used for name synthesis ("{canonical}.{domain}").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
}

impl Account {
    /// Convenience constructor for an account with no region or domain.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            region: None,
            domain: None,
        }
    }
}

/// Runtime settings for a resolution run.
///
/// Built once by [`crate::SettingsLoader`] and passed into the resolver and
/// cache at construction.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base URL of the inventory API. Required for `update`, unused by
    /// cache-only commands.
    pub endpoint: Option<String>,
    /// Bearer token for the inventory API.
    pub api_token: Option<SecretString>,
    /// Root directory of the record store and index file.
    pub cache_dir: PathBuf,
    /// Per-request timeout for provider queries.
    pub timeout: Duration,
    /// Upper bound on accounts queried in parallel.
    pub max_concurrency: usize,
    /// Suppress the account-name prefix in canonical names.
    pub no_account_prefix: bool,
    /// Accounts to enumerate.
    pub accounts: Vec<Account>,
}
