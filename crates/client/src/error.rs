//! Error types for provider queries and the persistence index.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while querying one account at the provider boundary.
///
/// Both variants are per-account and non-fatal to the batch: the resolver
/// collects them into a [`ResolveErrors`] aggregate and carries on with the
/// remaining accounts.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// A session for the account could not be established.
    #[error("can't establish a session for '{account}': {source}")]
    Access {
        account: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Listing instances failed mid-pagination.
    #[error("can't get full information for '{account}': {source}")]
    Query {
        account: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ProviderError {
    /// Name of the account this error belongs to.
    pub fn account(&self) -> &str {
        match self {
            Self::Access { account, .. } | Self::Query { account, .. } => account,
        }
    }
}

/// Aggregate of per-account failures from one resolution run.
///
/// Returned alongside any partial successes; callers decide whether partial
/// success is acceptable.
#[derive(Debug)]
pub struct ResolveErrors(pub Vec<ProviderError>);

impl ResolveErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for ResolveErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} account(s) failed: ", self.0.len())?;
        for (n, err) in self.0.iter().enumerate() {
            if n > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ResolveErrors {}

/// Errors raised by the persistence index.
#[derive(Debug, Error)]
pub enum CacheError {
    /// No index exists yet; a lookup was attempted before any save.
    #[error("cache doesn't exist, try \"fleet-ssh update\"")]
    Missing,

    /// The name is absent and fuzzy selection was aborted or empty.
    #[error("no entry found for '{0}'")]
    NotFound(String),

    /// Filesystem write or rename failure during save.
    #[error("can't write {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A record or index file could not be read.
    #[error("can't read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A record or index file could not be encoded or decoded.
    #[error("can't decode {path}: {source}")]
    Codec {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}
