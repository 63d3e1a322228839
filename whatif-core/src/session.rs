//! Durable snapshot of a browsing session.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;
use std::convert::Infallible;
use std::rc::Rc;

use crate::catalog::ScenarioId;
use crate::category::CategoryFilter;
use crate::error::PersistError;
use crate::history::ViewHistory;
use crate::theme::Theme;

/// Schema version written into every snapshot.
pub const SESSION_VERSION: u32 = 2;

/// Storage key; the suffix tracks [`SESSION_VERSION`].
pub const SESSION_KEY: &str = "whatif.session.v2";

/// Key the first releases used to store the bare theme name.
pub const LEGACY_THEME_KEY: &str = "theme";

/// Minimal string key-value store (browser `localStorage` or an in-memory map).
pub trait KeyValueStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// # Errors
    ///
    /// Returns an error if the value cannot be written (quota, private mode).
    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error>;

    /// # Errors
    ///
    /// Returns an error if the entry cannot be removed.
    fn remove(&self, key: &str) -> Result<(), Self::Error>;
}

/// Shared in-memory store; clones see the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    type Error = Infallible;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), Self::Error> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// Everything needed to resume browsing where the user left off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub version: u32,
    #[serde(default)]
    pub category: CategoryFilter,
    #[serde(default)]
    pub current_id: Option<ScenarioId>,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub history: ViewHistory,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            version: SESSION_VERSION,
            category: CategoryFilter::All,
            current_id: None,
            theme: Theme::default(),
            history: ViewHistory::default(),
        }
    }
}

/// Reads and writes [`SessionSnapshot`]s under a single versioned key.
#[derive(Debug, Clone)]
pub struct PersistedSession<S: KeyValueStore> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> PersistedSession<S> {
    pub fn new(store: S) -> Self {
        Self::with_key(store, SESSION_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    /// # Errors
    ///
    /// Returns an error if serialization or the backing store write fails.
    pub fn save(&self, snapshot: &SessionSnapshot) -> Result<(), PersistError> {
        let text = serde_json::to_string(snapshot)?;
        self.store
            .set(&self.key, &text)
            .map_err(|err| PersistError::Store(err.to_string()))
    }

    /// Read the snapshot, reporting why it could not be used.
    ///
    /// # Errors
    ///
    /// Returns an error for unreadable stores, corrupt JSON or a version mismatch.
    pub fn try_load(&self) -> Result<Option<SessionSnapshot>, PersistError> {
        let Some(text) = self
            .store
            .get(&self.key)
            .map_err(|err| PersistError::Store(err.to_string()))?
        else {
            return Ok(None);
        };
        let snapshot: SessionSnapshot = serde_json::from_str(&text)?;
        if snapshot.version != SESSION_VERSION {
            return Err(PersistError::VersionMismatch {
                found: snapshot.version,
                expected: SESSION_VERSION,
            });
        }
        Ok(Some(snapshot))
    }

    /// Read the snapshot; anything unusable is treated as absent.
    #[must_use]
    pub fn load(&self) -> Option<SessionSnapshot> {
        match self.try_load() {
            Ok(snapshot) => snapshot,
            Err(err) => {
                log::warn!("discarding persisted session: {err}");
                None
            }
        }
    }

    /// # Errors
    ///
    /// Returns an error if the backing store cannot remove the entry.
    pub fn clear(&self) -> Result<(), PersistError> {
        self.store
            .remove(&self.key)
            .map_err(|err| PersistError::Store(err.to_string()))
    }

    /// Theme saved by the first releases under their own bare key.
    #[must_use]
    pub fn legacy_theme(&self) -> Option<Theme> {
        self.store
            .get(LEGACY_THEME_KEY)
            .ok()
            .flatten()
            .and_then(|raw| Theme::parse(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::{DrawPool, HistoryPolicy, LinearHistory};

    fn populated() -> SessionSnapshot {
        SessionSnapshot {
            version: SESSION_VERSION,
            category: CategoryFilter::Tag("nature".into()),
            current_id: Some(ScenarioId(4)),
            theme: Theme::Light,
            history: ViewHistory::Linear(LinearHistory::from_parts(
                vec![ScenarioId(1), ScenarioId(4)],
                Some(1),
            )),
        }
    }

    #[test]
    fn save_then_load_roundtrips() {
        let session = PersistedSession::new(MemoryStore::new());
        assert!(session.load().is_none());

        let snapshot = populated();
        session.save(&snapshot).unwrap();
        assert_eq!(session.load(), Some(snapshot));

        let mut draw = SessionSnapshot::default();
        let mut pool = DrawPool::new();
        pool.mark(ScenarioId(9));
        draw.history = ViewHistory::Draw(pool);
        session.save(&draw).unwrap();
        let loaded = session.load().unwrap();
        assert_eq!(loaded, draw);
        assert_eq!(loaded.history.policy(), HistoryPolicy::Draw);
    }

    #[test]
    fn untagged_category_filter_survives_reload() {
        let session = PersistedSession::new(MemoryStore::new());
        let snapshot = SessionSnapshot {
            category: CategoryFilter::Tag(String::new()),
            current_id: Some(ScenarioId(2)),
            ..SessionSnapshot::default()
        };
        session.save(&snapshot).unwrap();
        let loaded = session.load().unwrap();
        assert_eq!(loaded.category, CategoryFilter::Tag(String::new()));
        assert_eq!(loaded, snapshot);
    }

    #[test]
    fn corrupt_payload_is_treated_as_absent() {
        let store = MemoryStore::new();
        store.set(SESSION_KEY, "{not json").unwrap();
        let session = PersistedSession::new(store);
        assert!(matches!(session.try_load(), Err(PersistError::Corrupt(_))));
        assert!(session.load().is_none());
    }

    #[test]
    fn version_mismatch_is_treated_as_absent() {
        let store = MemoryStore::new();
        let mut old = populated();
        old.version = 1;
        store
            .set(SESSION_KEY, &serde_json::to_string(&old).unwrap())
            .unwrap();
        let session = PersistedSession::new(store);
        assert!(matches!(
            session.try_load(),
            Err(PersistError::VersionMismatch {
                found: 1,
                expected: SESSION_VERSION
            })
        ));
        assert!(session.load().is_none());
    }

    #[test]
    fn key_embeds_the_schema_version() {
        assert!(SESSION_KEY.ends_with(&format!("v{SESSION_VERSION}")));
    }

    #[test]
    fn clear_removes_snapshot_and_legacy_theme_is_read() {
        let store = MemoryStore::new();
        store.set(LEGACY_THEME_KEY, "light").unwrap();
        let session = PersistedSession::new(store.clone());
        session.save(&populated()).unwrap();
        assert_eq!(store.len(), 2);
        session.clear().unwrap();
        assert!(session.load().is_none());
        assert_eq!(session.legacy_theme(), Some(Theme::Light));
    }
}
