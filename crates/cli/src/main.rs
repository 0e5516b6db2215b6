//! fleet-ssh - resolve cloud instances into named, relay-aware ssh targets.
//!
//! Responsibilities:
//! - Parse command-line arguments and environment variables.
//! - Layer settings (config file, environment, CLI flags) and hand them to
//!   the command handlers.
//! - Translate command failures into structured exit codes.
//!
//! Does NOT handle:
//! - Inventory resolution or cache persistence (see `crates/client`).
//!
//! Invariants:
//! - CLI flags override environment variables, which override the config
//!   file.
//! - Logs go to stderr; stdout is reserved for command output such as
//!   completion scripts.

mod args;
mod commands;
mod dispatch;
mod error;
mod interactive;

use std::time::Duration;

use args::Cli;
use clap::Parser;
use error::ExitCodeExt;
use fleet_config::SettingsLoader;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let settings = {
        let mut loader = SettingsLoader::new();
        if let Some(ref path) = cli.config {
            loader = loader.with_config_path(path.clone());
        }
        loader = match loader.from_file().and_then(SettingsLoader::from_env) {
            Ok(l) => l,
            Err(e) => {
                eprintln!("Error: {e:#}");
                std::process::exit(error::ExitCode::GeneralError.as_i32());
            }
        };
        if let Some(ref endpoint) = cli.endpoint {
            loader = loader.with_endpoint(endpoint.clone());
        }
        if let Some(ref token) = cli.api_token {
            loader = loader.with_api_token(token.clone());
        }
        if let Some(ref dir) = cli.cache_dir {
            loader = loader.with_cache_dir(dir.clone());
        }
        if let Some(timeout) = cli.timeout {
            loader = loader.with_timeout(Duration::from_secs(timeout));
        }
        if !cli.accounts.is_empty() {
            loader = loader.with_account_filter(cli.accounts.clone());
        }
        if cli.no_account_prefix {
            loader = loader.with_no_account_prefix(true);
        }
        match loader.build() {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Error: {e:#}");
                std::process::exit(error::ExitCode::GeneralError.as_i32());
            }
        }
    };

    if let Err(err) = dispatch::run_command(cli, &settings).await {
        eprintln!("Error: {err:#}");
        std::process::exit(err.exit_code().as_i32());
    }
}
