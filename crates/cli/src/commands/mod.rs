//! CLI command implementations.

pub mod completions;
pub mod connect;
pub mod reconf;
pub mod update;

use anyhow::{Context, Result, bail};
use fleet_client::{HttpProvider, ResolveOptions, ResolveOutcome, Resolver};
use fleet_config::Settings;

/// Run one full resolution pass over the configured accounts.
///
/// Shared by `update` and `reconf`; per-account failures stay inside the
/// returned outcome for the caller to judge.
pub async fn resolve_from_settings(settings: &Settings) -> Result<ResolveOutcome> {
    let endpoint = settings.endpoint.as_deref().context(
        "no inventory endpoint configured; pass --endpoint or set it in the config file",
    )?;
    if settings.accounts.is_empty() {
        bail!("no accounts configured; pass --account or add accounts to the config file");
    }

    let provider = HttpProvider::new(endpoint, settings.timeout, settings.api_token.clone())
        .context("can't build the inventory client")?;
    let resolver = Resolver::new(
        provider,
        ResolveOptions {
            no_account_prefix: settings.no_account_prefix,
            max_concurrency: settings.max_concurrency,
        },
    );

    Ok(resolver.resolve(&settings.accounts).await)
}
