//! Shared test utilities for fleet-ssh integration tests.
//!
//! Responsibilities:
//! - Provide a hermetic CLI command factory.
//!
//! Invariants / Assumptions:
//! - All `FLEET_SSH_*` variables from the host are cleared so tests only see
//!   what they set themselves.

use assert_cmd::Command;

/// Returns a hermetic `fleet-ssh` command for integration testing.
pub fn fleet_cmd() -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("fleet-ssh");

    cmd.env_remove("FLEET_SSH_ENDPOINT")
        .env_remove("FLEET_SSH_API_TOKEN")
        .env_remove("FLEET_SSH_CACHE_DIR")
        .env_remove("FLEET_SSH_CONFIG")
        .env_remove("FLEET_SSH_TIMEOUT")
        .env_remove("FLEET_SSH_ACCOUNTS")
        .env_remove("RUST_LOG");

    cmd
}
