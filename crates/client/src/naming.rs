//! Canonical name synthesis.
//!
//! Produces the unique, stable, human-typeable slug at position 0 of an
//! entry's names list.

/// Build the canonical slug from an account name, a raw display name and a
/// disambiguation suffix.
///
/// The account part is dropped when `raw_name` already starts with it, so
/// "prod" + "prod-web" yields "prod-web" rather than "prod-prod-web". The
/// suffix is the 1-based occurrence index and is empty (omitted) unless more
/// than one instance shares the same (account, name) pair. Runs of
/// whitespace and hyphens collapse into a single hyphen.
pub fn canonical_name(account: &str, raw_name: &str, suffix: &str) -> String {
    let mut parts: Vec<&str> = Vec::with_capacity(3);
    if !raw_name.starts_with(account) {
        parts.push(account);
    }
    parts.push(raw_name);
    if !suffix.is_empty() {
        parts.push(suffix);
    }
    collapse_separators(&parts.join("-"))
}

/// Collapse every run of whitespace or hyphen characters into one hyphen.
fn collapse_separators(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_separator = false;
    for ch in raw.chars() {
        if ch.is_whitespace() || ch == '-' {
            in_separator = true;
        } else {
            if in_separator {
                out.push('-');
                in_separator = false;
            }
            out.push(ch);
        }
    }
    if in_separator {
        out.push('-');
    }
    out
}
