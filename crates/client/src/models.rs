//! Data model for resolution runs.
//!
//! Responsibilities:
//! - Define the provider-reported instance snapshot (`RawInstance`).
//! - Define the resolved output units (`SshEntry`, `AccountSummary`).
//!
//! Does NOT handle:
//! - Grouping, naming or relay selection (see `resolve`, `naming`, `relay`).
//! - Persistence (see `cache`).
//!
//! Invariants:
//! - `RawInstance` is a read-only snapshot, never mutated after retrieval.
//! - `SshEntry.names` is non-empty; index 0 is the canonical name and the
//!   instance id always appears in the list.

use chrono::{DateTime, Utc};
use fleet_config::Account;
use serde::{Deserialize, Serialize};

/// One free-form key/value attribute on an instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A provider-reported compute instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawInstance {
    /// Unique instance identifier.
    pub instance_id: String,
    /// Private network address; every running instance has one.
    pub private_ip: String,
    /// Public network address, when one is attached.
    #[serde(default)]
    pub public_ip: Option<String>,
    /// Network-partition identifier (VPC-equivalent).
    pub vpc_id: String,
    /// Launch timestamp, used as the disambiguation tie-break.
    pub launch_time: DateTime<Utc>,
    /// Unordered attribute tags.
    #[serde(default)]
    pub tags: Vec<Tag>,
}

/// One resolved instance, the system's output unit.
///
/// Created once per resolution run and immutable thereafter; a later run
/// supersedes it wholesale, it is never patched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SshEntry {
    /// Owning account (name, region, domain).
    pub account: Account,
    /// Provider instance identifier.
    pub instance_id: String,
    /// Resolved connection address.
    pub address: String,
    /// Instance id of the relay entry to jump through, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy_jump: Option<String>,
    /// Port override from the "x-ssh-port" tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    /// Login-user override from the "x-ssh-user" tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    /// All names this entry answers to; index 0 is the canonical name.
    pub names: Vec<String>,
}

impl SshEntry {
    /// The canonical name (list position 0).
    pub fn canonical_name(&self) -> &str {
        &self.names[0]
    }
}

/// One account plus its resolved entries, sorted by canonical name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountSummary {
    pub account: Account,
    pub entries: Vec<SshEntry>,
}
