//! Interactive fuzzy selection over canonical names.
//!
//! Responsibilities:
//! - Implement the cache's `NamePicker` seam with a terminal fuzzy finder.
//!
//! Does NOT handle:
//! - Lookup logic or index loading (see `fleet-client`).

use dialoguer::FuzzySelect;
use fleet_client::NamePicker;
use tracing::debug;

/// Fuzzy finder over the canonical-names list. Esc/abort yields `None`,
/// which the cache reports as a lookup failure rather than a crash.
pub struct FuzzyPicker;

impl NamePicker for FuzzyPicker {
    fn pick(&self, names: &[String]) -> Option<usize> {
        match FuzzySelect::new()
            .with_prompt("Select an instance")
            .items(names)
            .interact_opt()
        {
            Ok(choice) => choice,
            Err(err) => {
                debug!(error = %err, "fuzzy selection failed");
                None
            }
        }
    }
}
