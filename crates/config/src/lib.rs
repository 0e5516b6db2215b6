//! Configuration management for fleet-ssh.
//!
//! This crate provides types and loaders for the account list and runtime
//! settings, layered from a config file, environment variables and CLI
//! overrides.

mod loader;
pub mod paths;
pub mod types;

pub use loader::{ConfigError, SettingsLoader, env_var_or_none};
pub use types::{Account, Settings};
