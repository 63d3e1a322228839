use anyhow::Result;
use std::rc::Rc;
use whatif_core::{HistoryPolicy, NavigationController, NavigationOptions, ScenarioStore};

pub mod catalog;

/// Inputs shared by every check of one iteration.
#[derive(Debug, Clone)]
pub struct CheckCtx {
    pub store: Rc<ScenarioStore>,
    pub seed: u64,
    pub now_ms: i64,
}

impl CheckCtx {
    pub fn options(&self, policy: HistoryPolicy) -> NavigationOptions {
        NavigationOptions {
            policy,
            seed: self.seed,
            now_ms: self.now_ms,
        }
    }

    pub fn session(&self, policy: HistoryPolicy) -> NavigationController {
        NavigationController::new(Rc::clone(&self.store), self.options(policy))
    }
}

pub type Check = fn(&CheckCtx) -> Result<()>;

#[derive(Debug, Clone)]
pub struct TestScenario {
    pub key: &'static str,
    pub name: &'static str,
    pub check: Check,
}

impl TestScenario {
    pub const fn new(key: &'static str, name: &'static str, check: Check) -> Self {
        Self { key, name, check }
    }

    pub fn run(&self, ctx: &CheckCtx) -> Result<()> {
        (self.check)(ctx)
    }
}

pub fn get_scenario(name: &str) -> Option<TestScenario> {
    let wanted = name.to_lowercase();
    catalog::catalog_scenarios().into_iter().find(|scenario| {
        scenario.key == wanted || catalog::alias(scenario.key).is_some_and(|alias| alias == wanted)
    })
}

pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    catalog::catalog_scenarios()
        .into_iter()
        .map(|scenario| (scenario.key, scenario.name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_accepts_keys_aliases_and_case() {
        assert_eq!(get_scenario("smoke").map(|s| s.key), Some("smoke"));
        assert_eq!(get_scenario("Routes").map(|s| s.key), Some("route-roundtrip"));
        assert!(get_scenario("missing").is_none());
    }

    #[test]
    fn listing_matches_catalog() {
        let listed = list_scenarios();
        assert_eq!(listed.len(), catalog::catalog_scenarios().len());
        assert!(listed.iter().any(|(key, _)| *key == "offline-lifecycle"));
    }
}
