//! What If Core
//!
//! Platform-agnostic navigation logic for the What If scenario browser.
//! This crate owns the scenario collection, the daily pick, view history,
//! URL routes, session persistence and the offline caching policy without any
//! UI or browser dependencies.

pub mod catalog;
pub mod category;
pub mod config;
pub mod daily;
pub mod error;
pub mod history;
pub mod navigation;
pub mod offline;
pub mod route;
pub mod session;
pub mod theme;

use std::rc::Rc;

// Re-export commonly used types
pub use catalog::{Consequences, ScenarioId, ScenarioRecord, ScenarioStore};
pub use category::{CategoryFilter, category_label, filter_label};
pub use config::AppConfig;
pub use daily::{DAY_MS, DailySelection, date_code, pick_daily};
pub use error::{ConfigError, LoadError, NavigationError, PersistError, WorkerError};
pub use history::{DrawPool, HistoryPolicy, LinearHistory, ViewHistory};
pub use navigation::{NavigationController, NavigationOptions, PendingEffects, start_session};
pub use offline::{CacheBackend, CacheManifest, OfflineCache, WorkerPhase};
pub use route::Route;
pub use session::{KeyValueStore, MemoryStore, PersistedSession, SessionSnapshot};
pub use theme::Theme;

/// Trait for abstracting where the scenario document comes from
/// Platform-specific implementations should provide this
pub trait ScenarioSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetch the raw JSON scenario document
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be retrieved.
    fn fetch_document(&self) -> Result<String, Self::Error>;
}

/// Wires a scenario source and a key-value store into browsing sessions
pub struct BrowserEngine<L, K>
where
    L: ScenarioSource,
    K: KeyValueStore,
{
    source: L,
    session: PersistedSession<K>,
    config: AppConfig,
}

impl<L, K> BrowserEngine<L, K>
where
    L: ScenarioSource,
    K: KeyValueStore,
{
    /// Create an engine persisting under the configured storage key
    pub fn new(source: L, store: K, config: AppConfig) -> Self {
        let session = PersistedSession::with_key(store, config.storage_key.clone());
        Self {
            source,
            session,
            config,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &AppConfig {
        &self.config
    }

    #[must_use]
    pub const fn persisted(&self) -> &PersistedSession<K> {
        &self.session
    }

    /// Load the collection, falling back to the bundled scenarios on failure
    #[must_use]
    pub fn load_store(&self) -> ScenarioStore {
        self.load_store_checked().0
    }

    /// Like [`Self::load_store`], also reporting whether the fallback was used
    #[must_use]
    pub fn load_store_checked(&self) -> (ScenarioStore, bool) {
        let loaded = ScenarioStore::load(&self.source);
        let usable = matches!(&loaded, Ok(store) if !store.is_empty());
        (ScenarioStore::load_or_fallback(loaded), !usable)
    }

    /// Start a session over a freshly loaded collection.
    #[must_use]
    pub fn open_session(
        &self,
        route: Option<Route>,
        seed: u64,
        now_ms: i64,
    ) -> NavigationController {
        self.open_with_store(self.load_store(), route, seed, now_ms)
    }

    /// Start a session: resume the persisted snapshot, then let `route` win.
    ///
    /// With no snapshot the legacy theme key, then the configured default,
    /// decide the starting theme.
    #[must_use]
    pub fn open_with_store(
        &self,
        store: ScenarioStore,
        route: Option<Route>,
        seed: u64,
        now_ms: i64,
    ) -> NavigationController {
        let options = NavigationOptions {
            policy: self.config.history_policy,
            seed,
            now_ms,
        };
        let snapshot = self.session.load();
        let fresh = snapshot.is_none();
        let mut controller = start_session(Rc::new(store), snapshot, route, options);
        if fresh {
            let theme = self
                .session
                .legacy_theme()
                .unwrap_or(self.config.default_theme);
            controller.set_theme(theme);
        }
        controller
    }

    /// Persist the controller's current snapshot
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be serialized or stored.
    pub fn save_session(&self, controller: &NavigationController) -> anyhow::Result<()> {
        self.session.save(&controller.snapshot())?;
        Ok(())
    }
}
