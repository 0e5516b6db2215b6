//! YAML cache integration tests: save/lookup round trips, the index alias
//! invariant, and the fuzzy-selection fallback.

use std::sync::Mutex;

use fleet_client::{
    AccountSummary, Cache, CacheError, CacheIndex, NamePicker, SshEntry, YamlCache,
};
use fleet_config::Account;

fn entry(account: &str, id: &str, canonical: &str, address: &str) -> SshEntry {
    SshEntry {
        account: Account::named(account),
        instance_id: id.to_string(),
        address: address.to_string(),
        proxy_jump: None,
        port: None,
        user: None,
        names: vec![
            canonical.to_string(),
            id.to_string(),
            format!("{address}.{account}"),
        ],
    }
}

fn summary(account: &str, entries: Vec<SshEntry>) -> AccountSummary {
    AccountSummary {
        account: Account::named(account),
        entries,
    }
}

fn read_index(dir: &std::path::Path) -> CacheIndex {
    let raw = std::fs::read_to_string(dir.join("index.yaml")).unwrap();
    serde_yaml::from_str(&raw).unwrap()
}

#[test]
fn every_name_resolves_back_to_the_full_entry() {
    let dir = tempfile::tempdir().unwrap();
    let cache = YamlCache::new(dir.path());

    let original = entry("prod", "i-1", "prod-web", "10.0.0.1");
    cache.save(&[summary("prod", vec![original.clone()])]).unwrap();

    for name in &original.names {
        let found = cache.lookup(name).unwrap();
        assert_eq!(found, original, "lookup({name}) must round-trip");
    }
}

#[test]
fn lookup_before_any_save_reports_a_missing_cache() {
    let dir = tempfile::tempdir().unwrap();
    let cache = YamlCache::new(dir.path());
    assert!(matches!(cache.lookup("prod-web"), Err(CacheError::Missing)));
    assert!(matches!(
        cache.list_canonical_names(),
        Err(CacheError::Missing)
    ));
}

#[test]
fn aliases_always_point_at_a_canonical_record() {
    let dir = tempfile::tempdir().unwrap();
    let cache = YamlCache::new(dir.path());

    cache
        .save(&[summary(
            "prod",
            vec![
                entry("prod", "i-1", "prod-web", "10.0.0.1"),
                entry("prod", "i-2", "prod-db", "10.0.0.2"),
            ],
        )])
        .unwrap();

    let index = read_index(dir.path());
    for (name, target) in &index.instances {
        if !target.is_empty() {
            assert_eq!(
                index.instances.get(target).map(String::as_str),
                Some(""),
                "alias {name} must resolve to a canonical key"
            );
        }
    }
}

#[test]
fn canonical_names_are_sorted_for_presentation() {
    let dir = tempfile::tempdir().unwrap();
    let cache = YamlCache::new(dir.path());

    cache
        .save(&[summary(
            "prod",
            vec![
                entry("prod", "i-1", "prod-zeta", "10.0.0.1"),
                entry("prod", "i-2", "prod-alpha", "10.0.0.2"),
            ],
        )])
        .unwrap();

    assert_eq!(
        cache.list_canonical_names().unwrap(),
        vec!["prod-alpha".to_string(), "prod-zeta".to_string()]
    );
}

#[test]
fn a_new_save_drops_entries_from_removed_accounts() {
    let dir = tempfile::tempdir().unwrap();

    let cache = YamlCache::new(dir.path());
    cache
        .save(&[summary("old", vec![entry("old", "i-old", "old-web", "10.1.0.1")])])
        .unwrap();

    // Second process: rebuild with a different account set.
    let cache = YamlCache::new(dir.path());
    cache
        .save(&[summary("new", vec![entry("new", "i-new", "new-web", "10.2.0.1")])])
        .unwrap();

    let index = read_index(dir.path());
    assert!(!index.instances.contains_key("old-web"));
    assert_eq!(cache.list_canonical_names().unwrap(), vec!["new-web".to_string()]);
}

/// Picker recording what it was offered and answering a fixed selection.
struct ScriptedPicker {
    answer: Option<usize>,
    offered: Mutex<Vec<String>>,
}

impl NamePicker for ScriptedPicker {
    fn pick(&self, names: &[String]) -> Option<usize> {
        *self.offered.lock().unwrap() = names.to_vec();
        self.answer
    }
}

#[test]
fn empty_lookup_with_aborted_fuzzy_selection_is_not_found() {
    // User abort during fuzzy selection; cache files stay untouched.
    let dir = tempfile::tempdir().unwrap();
    let seeded = YamlCache::new(dir.path());
    seeded
        .save(&[summary("prod", vec![entry("prod", "i-1", "prod-web", "10.0.0.1")])])
        .unwrap();
    let index_before = std::fs::read_to_string(dir.path().join("index.yaml")).unwrap();

    let cache = YamlCache::with_picker(
        dir.path(),
        Box::new(ScriptedPicker {
            answer: None,
            offered: Mutex::new(Vec::new()),
        }),
    );
    assert!(matches!(cache.lookup(""), Err(CacheError::NotFound(_))));

    let index_after = std::fs::read_to_string(dir.path().join("index.yaml")).unwrap();
    assert_eq!(index_before, index_after);
}

#[test]
fn fuzzy_selection_offers_canonical_names_and_resolves_the_choice() {
    let dir = tempfile::tempdir().unwrap();
    let seeded = YamlCache::new(dir.path());
    seeded
        .save(&[summary(
            "prod",
            vec![
                entry("prod", "i-1", "prod-db", "10.0.0.1"),
                entry("prod", "i-2", "prod-web", "10.0.0.2"),
            ],
        )])
        .unwrap();

    let picker = ScriptedPicker {
        answer: Some(1),
        offered: Mutex::new(Vec::new()),
    };
    let cache = YamlCache::with_picker(dir.path(), Box::new(picker));

    let found = cache.lookup("no-such-name").unwrap();
    assert_eq!(found.instance_id, "i-2");
    assert_eq!(found.canonical_name(), "prod-web");
}

#[test]
fn record_files_are_keyed_by_instance_id() {
    let dir = tempfile::tempdir().unwrap();
    let cache = YamlCache::new(dir.path());
    cache
        .save(&[summary("prod", vec![entry("prod", "i-42", "prod-web", "10.0.0.1")])])
        .unwrap();

    assert!(dir.path().join("instances").join("i-42.yaml").is_file());
}
