#[cfg(target_arch = "wasm32")]
use crate::app::state::AppState;
use crate::platform::{
    AppConfig, BrowserEngine, FetchedDocument, KeyValueStore, NavigationController, route,
};
#[cfg(target_arch = "wasm32")]
use yew::prelude::*;

/// Result of the startup sequence.
pub struct BootOutcome {
    pub controller: NavigationController,
    /// The fetched document was unusable and the bundled scenarios are shown.
    pub offline_data: bool,
}

/// Build the startup session from an already fetched document.
///
/// The persisted snapshot is resumed first and a valid URL fragment then
/// overrides the resumed position.
pub fn open_session<K: KeyValueStore>(
    document: FetchedDocument,
    store: K,
    config: &AppConfig,
    fragment: &str,
    seed: u64,
    now_ms: i64,
) -> BootOutcome {
    let engine = BrowserEngine::new(document, store, config.clone());
    let (scenarios, offline_data) = engine.load_store_checked();
    let controller = engine.open_with_store(scenarios, route::decode(fragment), seed, now_ms);
    log::debug!(
        "session opened on {:?} ({} scenarios)",
        controller.current_id(),
        controller.store().len()
    );
    BootOutcome {
        controller,
        offline_data,
    }
}

#[cfg(target_arch = "wasm32")]
#[allow(clippy::future_not_send)]
async fn fetch_document(config: &AppConfig) -> FetchedDocument {
    let url = crate::paths::asset_path(&config.scenarios_file);
    match crate::dom::fetch_text_with_timeout(&url, config.fetch_timeout_ms).await {
        Ok(text) => FetchedDocument::ok(text),
        Err(err) => {
            FetchedDocument::failed(format!("{url}: {}", crate::dom::js_error_message(&err)))
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[hook]
pub fn use_bootstrap(app_state: &AppState) {
    let state = app_state.clone();

    use_effect_with((), move |()| {
        let on_install = {
            let flag = state.install_available.clone();
            Callback::from(move |available: bool| flag.set(available))
        };
        crate::pwa::on_install_available(on_install);

        wasm_bindgen_futures::spawn_local(async move {
            let config = (*state.config).clone();
            let document = fetch_document(&config).await;
            let fragment = super::routing::current_fragment();
            #[allow(clippy::cast_sign_loss)]
            let seed = crate::dom::now_ms() as u64;
            let outcome = open_session(
                document,
                crate::storage::LocalStorageStore,
                &config,
                &fragment,
                seed,
                crate::dom::now_ms(),
            );
            let mut controller = outcome.controller;
            super::effects::commit(&mut controller, &config.storage_key);
            if let Some(route) = controller.route() {
                super::routing::replace_fragment(&route.fragment());
            }
            state.offline_data.set(outcome.offline_data);
            state.session.set(Some(controller));
            state.boot_ready.set(true);
        });
        || {}
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{
        CategoryFilter, DAY_MS, MemoryStore, PersistedSession, ScenarioId, SessionSnapshot, Theme,
    };

    const SHIPPED: &str = include_str!("../../static/data/scenarios.json");

    fn config() -> AppConfig {
        AppConfig::default_config()
    }

    #[test]
    fn fresh_start_shows_first_scenario() {
        let outcome = open_session(
            FetchedDocument::ok(SHIPPED.to_string()),
            MemoryStore::new(),
            &config(),
            "",
            7,
            0,
        );
        assert!(!outcome.offline_data);
        assert_eq!(outcome.controller.current_id(), Some(ScenarioId(1)));
        assert_eq!(outcome.controller.theme(), Theme::Dark);
    }

    #[test]
    fn failed_fetch_uses_bundled_scenarios() {
        let outcome = open_session(
            FetchedDocument::failed("timed out after 8000 ms".into()),
            MemoryStore::new(),
            &config(),
            "",
            7,
            0,
        );
        assert!(outcome.offline_data);
        assert!(outcome.controller.current().is_some());
    }

    #[test]
    fn fragment_overrides_persisted_position() {
        let store = MemoryStore::new();
        let snapshot = SessionSnapshot {
            category: CategoryFilter::Tag("tech".into()),
            current_id: Some(ScenarioId(5)),
            theme: Theme::Light,
            ..SessionSnapshot::default()
        };
        PersistedSession::new(store.clone()).save(&snapshot).unwrap();

        let resumed = open_session(
            FetchedDocument::ok(SHIPPED.to_string()),
            store.clone(),
            &config(),
            "",
            7,
            0,
        );
        assert_eq!(resumed.controller.current_id(), Some(ScenarioId(5)));
        assert_eq!(resumed.controller.theme(), Theme::Light);

        let linked = open_session(
            FetchedDocument::ok(SHIPPED.to_string()),
            store.clone(),
            &config(),
            "#id=8",
            7,
            0,
        );
        assert_eq!(linked.controller.current_id(), Some(ScenarioId(8)));
        assert!(linked.controller.category().is_all());

        let bogus = open_session(
            FetchedDocument::ok(SHIPPED.to_string()),
            store,
            &config(),
            "#id=999",
            7,
            0,
        );
        assert_eq!(bogus.controller.current_id(), Some(ScenarioId(5)));
    }

    #[test]
    fn daily_fragment_opens_todays_pick() {
        let outcome = open_session(
            FetchedDocument::ok(SHIPPED.to_string()),
            MemoryStore::new(),
            &config(),
            "#daily",
            7,
            DAY_MS * 4 + 1,
        );
        assert!(outcome.controller.is_current_daily());
        assert_eq!(outcome.controller.current_id(), Some(ScenarioId(5)));
    }
}
