//! CLI argument definitions and parsing.
//!
//! Responsibilities:
//! - Define the CLI structure using clap derive macros.
//! - Parse command-line arguments and environment variables.
//!
//! Non-responsibilities:
//! - Does not execute commands (see `dispatch` module).
//! - Does not load settings (see `fleet-config`).

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fleet-ssh")]
#[command(about = "Resolve cloud instances into named, relay-aware ssh targets", long_about = None)]
#[command(version)]
#[command(
    after_help = "Examples:\n  fleet-ssh update\n  fleet-ssh connect prod-web\n  fleet-ssh connect prod-web-2 --user admin\n  fleet-ssh reconf ~/.ssh/fleet_config\n  fleet-ssh --account prod --account staging update\n"
)]
pub struct Cli {
    /// Base URL of the inventory API
    #[arg(short, long, global = true, env = "FLEET_SSH_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Bearer token for the inventory API
    #[arg(short, long, global = true, env = "FLEET_SSH_API_TOKEN")]
    pub api_token: Option<String>,

    /// Account to query; repeat for several. Defaults to every configured
    /// account.
    #[arg(short = 'A', long = "account", global = true)]
    pub accounts: Vec<String>,

    /// Cache directory holding the record store and index
    #[arg(long, global = true, env = "FLEET_SSH_CACHE_DIR", value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Path to a custom configuration file (overrides the default location)
    #[arg(long, global = true, env = "FLEET_SSH_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Provider query timeout in seconds
    #[arg(long, global = true, env = "FLEET_SSH_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Do not prefix host names with the account name
    #[arg(short = 'n', long, global = true)]
    pub no_account_prefix: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Query all accounts and refresh the cache of ssh entries
    Update,

    /// Resolve a name (exact, then fuzzy) and ssh into the instance
    Connect {
        /// Canonical name, instance id, or any known alias. Omit to pick
        /// interactively.
        name: Option<String>,

        /// Login user, overriding the instance's tag
        #[arg(short, long)]
        user: Option<String>,

        /// Path of the generated per-connection ssh config
        #[arg(short = 'c', long, value_name = "FILE")]
        ssh_config_path: Option<PathBuf>,

        /// Extra arguments handed to ssh after the host
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        ssh_args: Vec<String>,
    },

    /// Query all accounts and write every entry into one ssh config file
    Reconf {
        /// Destination file; replaced atomically on success
        filename: PathBuf,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
