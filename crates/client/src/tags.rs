//! Typed reads over an instance's free-form tag set.
//!
//! Responsibilities:
//! - Extract display name, relay eligibility, login user and port override
//!   from provider tags.
//!
//! Invariants:
//! - Lookups never fail; absence is a valid, silent outcome.
//! - `value_of` is case-sensitive unless the caller asks otherwise, because
//!   lookups mix provider-defined keys ("Name") and convention keys
//!   ("x-ssh-user") that appear in mixed case.

use crate::models::Tag;

/// Substring that marks an instance as a relay host.
pub const RELAY_MARKER: &str = "bastion";

/// Tag keys that flag a relay for use across network partitions.
const GLOBAL_KEYS: [&str; 2] = ["Global", "x-ssh-global"];

const NAME_KEY: &str = "Name";
const USER_KEY: &str = "x-ssh-user";
const PORT_KEY: &str = "x-ssh-port";

/// First value for `key`, or `None` when absent.
pub fn value_of<'a>(tags: &'a [Tag], key: &str, case_insensitive: bool) -> Option<&'a str> {
    tags.iter()
        .find(|tag| {
            if case_insensitive {
                tag.key.eq_ignore_ascii_case(key)
            } else {
                tag.key == key
            }
        })
        .map(|tag| tag.value.as_str())
}

/// Lower-cased value of the "Name" tag, or empty.
pub fn display_name(tags: &[Tag]) -> String {
    value_of(tags, NAME_KEY, false)
        .unwrap_or_default()
        .to_lowercase()
}

/// Lower-cased login-user override, or `None`.
pub fn user_of(tags: &[Tag]) -> Option<String> {
    value_of(tags, USER_KEY, true).map(|v| v.to_lowercase())
}

/// Port override; unparsable values are treated as absent.
pub fn port_of(tags: &[Tag]) -> Option<u16> {
    value_of(tags, PORT_KEY, true).and_then(|v| v.trim().parse().ok())
}

fn is_truthy(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "yes" | "true" | "1")
}

/// True iff the display name marks this instance as a relay host.
///
/// With `require_global`, the instance must additionally carry a truthy
/// value under one of the global-flag keys, marking it usable across
/// network partitions.
pub fn is_relay(tags: &[Tag], require_global: bool) -> bool {
    if !display_name(tags).contains(RELAY_MARKER) {
        return false;
    }
    if !require_global {
        return true;
    }
    GLOBAL_KEYS
        .iter()
        .any(|key| value_of(tags, key, false).is_some_and(is_truthy))
}
