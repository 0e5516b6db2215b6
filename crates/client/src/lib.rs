//! Topology resolution and identity engine for fleet-ssh.
//!
//! This crate discovers running compute instances across isolated cloud
//! accounts through a pluggable provider boundary, infers which instances
//! are reachable only through a relay (bastion) host, assigns stable
//! human-readable names, and persists the result in a content-addressed
//! record store for later name resolution.

pub mod cache;
pub mod error;
pub mod models;
mod naming;
pub mod provider;
pub mod relay;
pub mod resolve;
pub mod ssh_config;
pub mod tags;

pub use cache::{
    Cache, NamePicker,
    yaml::{CacheIndex, YamlCache},
};
pub use error::{CacheError, ProviderError, ResolveErrors};
pub use models::{AccountSummary, RawInstance, SshEntry, Tag};
pub use naming::canonical_name;
pub use provider::{HttpProvider, InstanceProvider, ProviderInventory};
pub use resolve::{ResolveOptions, ResolveOutcome, Resolver};
pub use ssh_config::write_ssh_config;
