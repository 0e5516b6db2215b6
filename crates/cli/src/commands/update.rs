//! Update command: refresh the cache of ssh entries.

use anyhow::{Context, Result};
use fleet_client::{Cache, YamlCache};
use fleet_config::Settings;
use tracing::{info, warn};

pub async fn run(settings: &Settings) -> Result<()> {
    let outcome = super::resolve_from_settings(settings).await?;

    if let Some(errors) = outcome.errors {
        if outcome.summaries.is_empty() {
            // Nothing succeeded; an empty cache rebuild would only destroy
            // the previous snapshot.
            return Err(anyhow::Error::new(errors)
                .context("every account failed, keeping the existing cache"));
        }
        warn!(%errors, "some accounts failed; their entries are dropped from the cache");
    }

    let cache = YamlCache::new(&settings.cache_dir);
    cache
        .save(&outcome.summaries)
        .context("can't save the cache")?;

    let entries: usize = outcome.summaries.iter().map(|s| s.entries.len()).sum();
    info!(
        accounts = outcome.summaries.len(),
        entries,
        cache_dir = %settings.cache_dir.display(),
        "cache updated"
    );
    Ok(())
}
