use std::collections::HashSet;

use whatif_core::category::KNOWN_CATEGORIES;
use whatif_core::offline::{APP_SHELL_ASSETS, CACHE_NAME};
use whatif_core::{AppConfig, HistoryPolicy, ScenarioStore, Theme};

fn shipped_store() -> ScenarioStore {
    ScenarioStore::from_json(include_str!(
        "../../whatif-web/static/data/scenarios.json"
    ))
    .unwrap()
}

#[test]
fn shipped_scenarios_are_complete() {
    let store = shipped_store();
    assert!(store.len() >= 10);
    let mut ids = HashSet::new();
    for record in store.records() {
        assert!(ids.insert(record.id), "duplicate id {}", record.id);
        assert!(!record.title.is_empty(), "{} has no title", record.id);
        assert!(!record.intro.is_empty(), "{} has no intro", record.id);
        assert!(!record.changed.is_empty(), "{} has no changes", record.id);
        assert!(!record.disappeared.is_empty(), "{} has no losses", record.id);
        assert!(!record.consequences.internet.is_empty());
        assert!(!record.consequences.people.is_empty());
        assert!(!record.consequences.technology.is_empty());
        assert!(!record.conclusion.is_empty());
        assert!(
            KNOWN_CATEGORIES.contains(&record.category.as_str()),
            "{} uses unknown category {}",
            record.id,
            record.category
        );
    }
}

#[test]
fn every_known_category_has_scenarios() {
    let store = shipped_store();
    let categories = store.categories();
    for tag in KNOWN_CATEGORIES {
        assert!(categories.contains(&tag), "no scenarios tagged {tag}");
    }
}

#[test]
fn bundled_fallback_is_usable() {
    let bundled = ScenarioStore::bundled();
    assert!(!bundled.is_empty());
    assert!(bundled.records().iter().all(|r| !r.title.is_empty()));
}

#[test]
fn shipped_config_matches_defaults() {
    let cfg = AppConfig::from_json(include_str!(
        "../../whatif-web/static/data/config.json"
    ))
    .unwrap();
    assert_eq!(cfg, AppConfig::default_config());
    assert_eq!(cfg.default_theme, Theme::Dark);
    assert_eq!(cfg.history_policy, HistoryPolicy::Linear);
    assert_eq!(cfg.cache.bucket, CACHE_NAME);
    assert_eq!(cfg.cache.assets, APP_SHELL_ASSETS.map(str::to_string).to_vec());
}
