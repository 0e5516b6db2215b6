//! Connect command: look up a cached entry and exec ssh against it.
//!
//! The command never talks to the inventory endpoint; it works purely off
//! the cache written by `update`. A scratch ssh config is (re)written for
//! every connection so the relay chain always matches the cached entry.

use std::path::PathBuf;
use std::process::Command;

use anyhow::{Context, Result};
use fleet_client::{Cache, YamlCache, write_ssh_config};
use fleet_config::Settings;
use tracing::{debug, info};

use crate::interactive::FuzzyPicker;

pub async fn run(
    settings: &Settings,
    name: Option<String>,
    user: Option<String>,
    ssh_config_path: Option<PathBuf>,
    ssh_args: Vec<String>,
) -> Result<()> {
    let cache = YamlCache::with_picker(&settings.cache_dir, Box::new(FuzzyPicker));

    // An absent name falls through to the fuzzy finder inside the cache.
    let mut entry = cache.lookup(name.as_deref().unwrap_or(""))?;
    if let Some(user) = user {
        entry.user = Some(user);
    }

    let mut entries = vec![entry];
    if let Some(relay_id) = entries[0].proxy_jump.clone() {
        let relay = cache
            .lookup(&relay_id)
            .with_context(|| format!("can't load the relay entry '{relay_id}'"))?;
        entries.push(relay);
    }

    let config_path = match ssh_config_path {
        Some(path) => path,
        None => default_ssh_config_path()?,
    };
    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("can't create {}", parent.display()))?;
    }
    write_ssh_config(&entries, &config_path)
        .with_context(|| format!("can't write {}", config_path.display()))?;

    let target = entries[0].canonical_name().to_owned();
    info!(host = %target, config = %config_path.display(), "connecting");
    exec_ssh(&config_path, &target, &ssh_args)
}

/// Scratch config for a single connection, kept next to the user's own
/// ssh config so `Include` directives can pick it up if wanted.
fn default_ssh_config_path() -> Result<PathBuf> {
    let dirs = directories::UserDirs::new().context("can't determine the home directory")?;
    Ok(dirs.home_dir().join(".ssh").join("fleet_ssh_config"))
}

fn build_command(config_path: &std::path::Path, target: &str, ssh_args: &[String]) -> Command {
    let mut cmd = Command::new("ssh");
    cmd.arg("-F").arg(config_path).arg("-tt").arg(target);
    cmd.args(ssh_args);
    cmd
}

#[cfg(unix)]
fn exec_ssh(config_path: &std::path::Path, target: &str, ssh_args: &[String]) -> Result<()> {
    use std::os::unix::process::CommandExt;

    let mut cmd = build_command(config_path, target, ssh_args);
    debug!(?cmd, "replacing process with ssh");
    // exec only returns on failure.
    let err = cmd.exec();
    Err(anyhow::Error::new(err).context("can't exec ssh"))
}

#[cfg(not(unix))]
fn exec_ssh(config_path: &std::path::Path, target: &str, ssh_args: &[String]) -> Result<()> {
    let status = build_command(config_path, target, ssh_args)
        .status()
        .context("can't run ssh")?;
    if !status.success() {
        anyhow::bail!("ssh exited with {status}");
    }
    Ok(())
}
