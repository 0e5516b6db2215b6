//! Reconf command: regenerate a full ssh config file from live inventory.

use std::path::Path;

use anyhow::{Context, Result};
use fleet_client::write_ssh_config;
use fleet_config::Settings;
use tracing::{info, warn};

pub async fn run(settings: &Settings, filename: &Path) -> Result<()> {
    let outcome = super::resolve_from_settings(settings).await?;

    if let Some(errors) = outcome.errors {
        if outcome.summaries.is_empty() {
            return Err(anyhow::Error::new(errors)
                .context("every account failed, leaving the existing file untouched"));
        }
        warn!(%errors, "some accounts failed; their entries are left out of the file");
    }

    let entries: Vec<_> = outcome
        .summaries
        .into_iter()
        .flat_map(|summary| summary.entries)
        .collect();

    write_ssh_config(&entries, filename)
        .with_context(|| format!("can't write {}", filename.display()))?;

    info!(entries = entries.len(), file = %filename.display(), "ssh config written");
    Ok(())
}
