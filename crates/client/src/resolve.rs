//! Account enumeration: concurrent fan-out, grouping, relay assignment and
//! naming.
//!
//! Responsibilities:
//! - Query every configured account concurrently through the provider
//!   boundary, tolerating per-account failures.
//! - Partition each account's instances by network partition and display
//!   name, assign disambiguation indices, select relays and assemble the
//!   names list for every entry.
//!
//! Does NOT handle:
//! - Provider transport details (see `provider`).
//! - Persistence (see `cache`).
//!
//! Invariants:
//! - No shared mutable state across workers; each returns an owned value.
//! - Summaries are sorted by account name after collection, so output is
//!   reproducible regardless of completion order.
//! - Siblings in a name group are ordered by (name, launch time) before
//!   indices are assigned, so repeated runs on identical input produce
//!   identical names.

use std::collections::BTreeMap;

use futures::StreamExt;
use tracing::{debug, info, warn};

use crate::error::{ProviderError, ResolveErrors};
use crate::models::{AccountSummary, RawInstance, SshEntry};
use crate::naming::canonical_name;
use crate::provider::InstanceProvider;
use crate::{relay, tags};
use fleet_config::Account;

/// Tunables for a resolution run, passed in at construction.
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// Suppress the account-name prefix in canonical names.
    pub no_account_prefix: bool,
    /// Upper bound on accounts queried in parallel.
    pub max_concurrency: usize,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            no_account_prefix: false,
            max_concurrency: fleet_config::types::DEFAULT_MAX_CONCURRENCY,
        }
    }
}

/// Result of one resolution run: partial successes plus the aggregate of
/// per-account failures.
#[derive(Debug)]
pub struct ResolveOutcome {
    /// Summaries for accounts that resolved, sorted by account name.
    pub summaries: Vec<AccountSummary>,
    /// Aggregate error, when at least one account failed.
    pub errors: Option<ResolveErrors>,
}

/// The account enumerator.
pub struct Resolver<P> {
    provider: P,
    options: ResolveOptions,
}

impl<P: InstanceProvider + Sync> Resolver<P> {
    pub fn new(provider: P, options: ResolveOptions) -> Self {
        Self { provider, options }
    }

    /// Resolve all accounts concurrently.
    ///
    /// A failing account contributes one error to the aggregate and does not
    /// abort its siblings; partial success is the default outcome, not an
    /// exception.
    pub async fn resolve(&self, accounts: &[Account]) -> ResolveOutcome {
        info!(accounts = accounts.len(), "resolving accounts");

        let queries = accounts.iter().map(|account| async move {
            let result = self.provider.list_running_instances(account).await;
            (account, result)
        });

        let results: Vec<_> = futures::stream::iter(queries)
            .buffer_unordered(self.options.max_concurrency.max(1))
            .collect()
            .await;

        let mut summaries = Vec::new();
        let mut errors: Vec<ProviderError> = Vec::new();

        for (account, result) in results {
            match result {
                Ok(inventory) => {
                    let account = Account {
                        name: account.name.clone(),
                        region: inventory.region.or_else(|| account.region.clone()),
                        domain: account.domain.clone(),
                    };
                    let entries = build_entries(
                        &account,
                        &inventory.instances,
                        self.options.no_account_prefix,
                    );
                    summaries.push(AccountSummary { account, entries });
                }
                Err(err) => {
                    warn!(account = %account.name, error = %err, "account failed");
                    errors.push(err);
                }
            }
        }

        summaries.sort_by(|a, b| a.account.name.cmp(&b.account.name));

        ResolveOutcome {
            summaries,
            errors: if errors.is_empty() {
                None
            } else {
                Some(ResolveErrors(errors))
            },
        }
    }
}

/// Group, name and relay-assign one account's instances.
fn build_entries(account: &Account, instances: &[RawInstance], no_prefix: bool) -> Vec<SshEntry> {
    // Deterministic base order: display name, then launch time.
    let mut ordered: Vec<&RawInstance> = instances.iter().collect();
    ordered.sort_by(|a, b| {
        tags::display_name(&a.tags)
            .cmp(&tags::display_name(&b.tags))
            .then(a.launch_time.cmp(&b.launch_time))
    });

    // Relays flagged for use across partitions, account-wide.
    let common_relays: Vec<&RawInstance> = ordered
        .iter()
        .copied()
        .filter(|i| tags::is_relay(&i.tags, true))
        .collect();
    debug!(account = %account.name, relays = common_relays.len(), "common relays");

    // Partition by vpc, preserving the deterministic base order.
    let mut partitions: BTreeMap<&str, Vec<&RawInstance>> = BTreeMap::new();
    for instance in &ordered {
        partitions
            .entry(instance.vpc_id.as_str())
            .or_default()
            .push(instance);
    }

    let mut entries = Vec::with_capacity(instances.len());
    for (vpc_id, members) in &partitions {
        let local_relays: Vec<&RawInstance> = members
            .iter()
            .copied()
            .filter(|i| tags::is_relay(&i.tags, false))
            .collect();
        debug!(account = %account.name, vpc = vpc_id, relays = local_relays.len(), "local relays");

        // Group siblings by display name; a fleet sharing one name gets
        // disambiguation indices.
        let mut name_groups: BTreeMap<String, Vec<&RawInstance>> = BTreeMap::new();
        for instance in members {
            name_groups
                .entry(tags::display_name(&instance.tags))
                .or_default()
                .push(instance);
        }

        for (raw_name, group) in &name_groups {
            for (n, instance) in group.iter().enumerate() {
                let suffix = if group.len() > 1 {
                    (n + 1).to_string()
                } else {
                    String::new()
                };
                entries.push(build_entry(
                    account,
                    instance,
                    raw_name,
                    &suffix,
                    &local_relays,
                    &common_relays,
                    no_prefix,
                ));
            }
        }
    }

    // Final ordering of the summary: canonical name, alphabetically.
    entries.sort_by(|a, b| a.names[0].cmp(&b.names[0]));
    entries
}

fn build_entry(
    account: &Account,
    instance: &RawInstance,
    raw_name: &str,
    suffix: &str,
    local_relays: &[&RawInstance],
    common_relays: &[&RawInstance],
    no_prefix: bool,
) -> SshEntry {
    // Local candidates first, global fallback second.
    let relay = relay::select(raw_name, local_relays)
        .or_else(|| relay::select(raw_name, common_relays));

    // Private address by default; with a relay assigned the private address
    // stays and the relay id becomes the jump reference, otherwise a public
    // address wins when one exists.
    let mut address = instance.private_ip.clone();
    let proxy_jump = match relay {
        Some(relay) => Some(relay.instance_id.clone()),
        None => {
            if let Some(public_ip) = &instance.public_ip {
                address = public_ip.clone();
            }
            None
        }
    };

    let account_part = if no_prefix { "" } else { account.name.as_str() };
    let name = canonical_name(account_part, raw_name, suffix);

    let mut names = vec![
        name.clone(),
        instance.instance_id.clone(),
        format!("{}.{}", address, account.name),
    ];
    if let Some(domain) = &account.domain {
        names.push(format!("{name}.{domain}"));
    }

    SshEntry {
        account: account.clone(),
        instance_id: instance.instance_id.clone(),
        address,
        proxy_jump,
        port: tags::port_of(&instance.tags),
        user: tags::user_of(&instance.tags),
        names,
    }
}
