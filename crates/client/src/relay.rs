//! Relay (bastion) selection.
//!
//! Responsibilities:
//! - Pick the relay host, if any, a target instance should jump through.
//!
//! Invariants:
//! - A target whose own name contains the relay marker never gets a relay,
//!   so relay chains cannot point at themselves.
//! - With more than one candidate, scoring sorts ascending by longest
//!   common subsequence length against the target name and returns the
//!   first, breaking ties by input order. The smallest score winning is the
//!   behavior the fleet depends on; keep it (see DESIGN.md).

use crate::models::RawInstance;
use crate::tags::{RELAY_MARKER, display_name};

/// Select the relay for `target_name` from `candidates`, or `None`.
pub fn select<'a>(target_name: &str, candidates: &[&'a RawInstance]) -> Option<&'a RawInstance> {
    if target_name.contains(RELAY_MARKER) || candidates.is_empty() {
        return None;
    }
    if candidates.len() == 1 {
        return Some(candidates[0]);
    }

    let mut scored: Vec<(usize, &RawInstance)> = candidates
        .iter()
        .map(|candidate| {
            let name = display_name(&candidate.tags);
            (lcs_len(target_name, &name), *candidate)
        })
        .collect();
    scored.sort_by_key(|(score, _)| *score);
    scored.first().map(|(_, candidate)| *candidate)
}

/// Length of the longest common subsequence (not substring) of two strings.
fn lcs_len(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    // Single-row DP; inputs are short tag names.
    let mut row = vec![0usize; b.len() + 1];
    for &ca in &a {
        let mut prev_diag = 0;
        for (j, &cb) in b.iter().enumerate() {
            let prev_row = row[j + 1];
            row[j + 1] = if ca == cb {
                prev_diag + 1
            } else {
                row[j + 1].max(row[j])
            };
            prev_diag = prev_row;
        }
    }
    row[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Tag;
    use chrono::Utc;

    fn instance(id: &str, name: &str) -> RawInstance {
        RawInstance {
            instance_id: id.to_string(),
            private_ip: "10.0.0.1".to_string(),
            public_ip: None,
            vpc_id: "vpc-1".to_string(),
            launch_time: Utc::now(),
            tags: vec![Tag::new("Name", name)],
        }
    }

    #[test]
    fn lcs_is_subsequence_not_substring() {
        assert_eq!(lcs_len("abcde", "ace"), 3);
        assert_eq!(lcs_len("worker", "bastion"), 1); // shared 'o'
        assert_eq!(lcs_len("", "anything"), 0);
        assert_eq!(lcs_len("same", "same"), 4);
    }

    #[test]
    fn relay_targets_never_get_a_relay() {
        let candidate = instance("i-b", "bastion-a");
        assert!(select("bastion-eu", &[&candidate]).is_none());
    }

    #[test]
    fn empty_candidates_yield_none() {
        assert!(select("worker", &[]).is_none());
    }

    #[test]
    fn a_single_candidate_wins_regardless_of_similarity() {
        let candidate = instance("i-b", "zzz");
        let picked = select("worker", &[&candidate]).unwrap();
        assert_eq!(picked.instance_id, "i-b");
    }

    #[test]
    fn smallest_lcs_wins_among_multiple_candidates() {
        // "bastion-a" shares less with "worker-01" than "bastion-worker".
        let distant = instance("i-a", "bastion-a");
        let close = instance("i-w", "bastion-worker");
        let picked = select("worker-01", &[&close, &distant]).unwrap();
        assert_eq!(picked.instance_id, "i-a");
    }

    #[test]
    fn ties_break_by_input_order() {
        let first = instance("i-1", "bastion-x");
        let second = instance("i-2", "bastion-x");
        let picked = select("worker", &[&first, &second]).unwrap();
        assert_eq!(picked.instance_id, "i-1");
    }
}
