//! `localStorage` implementation of the session key-value store.

use crate::platform::KeyValueStore;

#[derive(Debug, thiserror::Error)]
pub enum WebStorageError {
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Browser `localStorage`; every call reacquires the handle so a store
/// disabled mid-session (private mode, quota) reports an error instead of panicking.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageStore;

impl LocalStorageStore {
    fn handle() -> Result<web_sys::Storage, WebStorageError> {
        crate::dom::local_storage()
            .map_err(|err| WebStorageError::Storage(crate::dom::js_error_message(&err)))
    }
}

impl KeyValueStore for LocalStorageStore {
    type Error = WebStorageError;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Self::handle()?
            .get_item(key)
            .map_err(|err| WebStorageError::Storage(crate::dom::js_error_message(&err)))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        Self::handle()?
            .set_item(key, value)
            .map_err(|err| WebStorageError::Storage(crate::dom::js_error_message(&err)))
    }

    fn remove(&self, key: &str) -> Result<(), Self::Error> {
        Self::handle()?
            .remove_item(key)
            .map_err(|err| WebStorageError::Storage(crate::dom::js_error_message(&err)))
    }
}
