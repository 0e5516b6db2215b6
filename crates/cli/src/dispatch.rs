//! Command dispatch logic.
//!
//! Responsibilities:
//! - Route parsed CLI arguments to the command handlers.
//!
//! Does NOT handle:
//! - CLI structure definitions (see `args` module).
//! - Settings loading (see `main()`).

use anyhow::Result;
use fleet_config::Settings;

use crate::args::{Cli, Commands};
use crate::commands;

pub(crate) async fn run_command(cli: Cli, settings: &Settings) -> Result<()> {
    match cli.command {
        Commands::Update => commands::update::run(settings).await,
        Commands::Connect {
            name,
            user,
            ssh_config_path,
            ssh_args,
        } => commands::connect::run(settings, name, user, ssh_config_path, ssh_args).await,
        Commands::Reconf { filename } => commands::reconf::run(settings, &filename).await,
        Commands::Completions { shell } => commands::completions::run(shell),
    }
}
