//! Provider query boundary.
//!
//! Responsibilities:
//! - Define the `InstanceProvider` trait the resolver fans out over.
//! - Ship `HttpProvider`, a reqwest-backed implementation against the JSON
//!   inventory API, following pagination tokens until exhausted.
//!
//! Does NOT handle:
//! - Grouping, naming or relay selection (see `resolve`).
//! - Retries; retries, if wanted, are an external policy layered by the
//!   caller.
//!
//! Invariants:
//! - Only "running" instances are requested.
//! - A first-page failure surfaces as `ProviderError::Access`, a later-page
//!   failure as `ProviderError::Query`; either way one error per account.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::debug;

use crate::error::ProviderError;
use crate::models::RawInstance;
use fleet_config::Account;

/// Everything one account query reports back.
#[derive(Debug, Clone)]
pub struct ProviderInventory {
    /// Region the account resolved to, when the provider reports one.
    pub region: Option<String>,
    /// All running instances, across every page.
    pub instances: Vec<RawInstance>,
}

/// The per-account "list running instances" boundary.
///
/// Implementations return an owned snapshot; the resolver never calls back
/// into the provider after enumeration.
pub trait InstanceProvider {
    fn list_running_instances(
        &self,
        account: &Account,
    ) -> impl Future<Output = Result<ProviderInventory, ProviderError>> + Send;
}

/// One page of the inventory API response.
#[derive(Debug, Deserialize)]
struct InventoryPage {
    #[serde(default)]
    region: Option<String>,
    #[serde(default)]
    instances: Vec<RawInstance>,
    #[serde(default)]
    next_page_token: Option<String>,
}

/// Inventory API client.
///
/// Queries `GET {base}/v1/accounts/{name}/instances?state=running` and
/// follows `next_page_token` until the provider stops returning one.
#[derive(Debug, Clone)]
pub struct HttpProvider {
    http: reqwest::Client,
    base_url: String,
    api_token: Option<SecretString>,
}

impl HttpProvider {
    /// Build a provider for `base_url`. The URL is normalized to carry no
    /// trailing slash.
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        api_token: Option<SecretString>,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_token,
        })
    }

    fn instances_url(&self, account: &Account) -> String {
        format!("{}/v1/accounts/{}/instances", self.base_url, account.name)
    }

    async fn fetch_page(
        &self,
        url: &str,
        page_token: Option<&str>,
    ) -> Result<InventoryPage, reqwest::Error> {
        let mut query: Vec<(&str, &str)> = vec![("state", "running")];
        if let Some(token) = page_token {
            query.push(("page_token", token));
        }

        let mut request = self.http.get(url).query(&query);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token.expose_secret());
        }

        request.send().await?.error_for_status()?.json().await
    }
}

impl InstanceProvider for HttpProvider {
    async fn list_running_instances(
        &self,
        account: &Account,
    ) -> Result<ProviderInventory, ProviderError> {
        let url = self.instances_url(account);

        let first = self
            .fetch_page(&url, None)
            .await
            .map_err(|source| ProviderError::Access {
                account: account.name.clone(),
                source: source.into(),
            })?;

        let mut inventory = ProviderInventory {
            region: first.region,
            instances: first.instances,
        };

        let mut page_token = first.next_page_token;
        let mut pages = 1usize;
        while let Some(token) = page_token {
            let page = self
                .fetch_page(&url, Some(&token))
                .await
                .map_err(|source| ProviderError::Query {
                    account: account.name.clone(),
                    source: source.into(),
                })?;
            inventory.instances.extend(page.instances);
            page_token = page.next_page_token;
            pages += 1;
        }

        debug!(
            account = %account.name,
            pages,
            instances = inventory.instances.len(),
            "listed running instances"
        );
        Ok(inventory)
    }
}
