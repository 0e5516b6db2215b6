//! Persistence index over resolved entries.
//!
//! Responsibilities:
//! - Define the polymorphic `Cache` boundary (save, lookup, list) so
//!   alternate backends can be substituted without touching the resolver.
//! - Define the `NamePicker` seam through which interactive fuzzy selection
//!   is injected by the caller.
//!
//! Does NOT handle:
//! - Terminal interaction; the shipped picker lives in the CLI crate.
//!
//! Invariants:
//! - The index is rebuilt wholesale on every save, never patched.

pub mod yaml;

use crate::error::CacheError;
use crate::models::{AccountSummary, SshEntry};

/// Picks one name out of the canonical-names list when an exact lookup
/// misses. Returning `None` means the user aborted (or no picker exists).
pub trait NamePicker {
    fn pick(&self, names: &[String]) -> Option<usize>;
}

/// A picker that never selects anything. Lookup misses with this picker
/// always surface as [`CacheError::NotFound`].
pub struct NoPicker;

impl NamePicker for NoPicker {
    fn pick(&self, _names: &[String]) -> Option<usize> {
        None
    }
}

/// The persisted lookup structure over resolved entries.
pub trait Cache {
    /// Write one self-contained record per entry, then rebuild and persist
    /// the index from scratch. Stale entries from accounts no longer present
    /// are not preserved.
    fn save(&self, summaries: &[AccountSummary]) -> Result<(), CacheError>;

    /// Resolve `name` to its full record. An empty or unknown name falls
    /// back to fuzzy selection over the canonical names.
    fn lookup(&self, name: &str) -> Result<SshEntry, CacheError>;

    /// All known canonical host names, sorted alphabetically.
    fn list_canonical_names(&self) -> Result<Vec<String>, CacheError>;
}
