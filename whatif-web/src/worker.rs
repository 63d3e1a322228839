//! Service worker entry points over the browser `CacheStorage`.
//!
//! `static/sw.js` registers the install/activate/fetch listeners synchronously
//! and forwards each event here once the wasm module is ready. Every event
//! builds its own [`OfflineCache`] because the browser may stop and restart the
//! worker between events.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Cache, CacheStorage, Request, Response, ServiceWorkerGlobalScope};

use crate::platform::{CacheBackend, CacheManifest};
#[cfg(target_arch = "wasm32")]
use crate::platform::OfflineCache;

/// [`CacheBackend`] over the worker's `caches` and `fetch`.
#[derive(Debug, Clone)]
pub struct BrowserCache {
    scope: ServiceWorkerGlobalScope,
}

impl BrowserCache {
    /// Bind to the current worker global scope.
    ///
    /// # Errors
    /// Returns an error when not running inside a service worker.
    pub fn from_global() -> Result<Self, String> {
        js_sys::global()
            .dyn_into::<ServiceWorkerGlobalScope>()
            .map(|scope| Self { scope })
            .map_err(|_| "not running in a service worker".to_string())
    }

    fn caches(&self) -> Result<CacheStorage, String> {
        self.scope
            .caches()
            .map_err(|err| crate::dom::js_error_message(&err))
    }
}

#[allow(clippy::future_not_send)]
async fn settle(promise: js_sys::Promise) -> Result<JsValue, String> {
    JsFuture::from(promise)
        .await
        .map_err(|err| crate::dom::js_error_message(&err))
}

impl CacheBackend for BrowserCache {
    type Request = Request;
    type Response = Response;
    type Error = String;

    async fn put_all(&self, bucket: &str, assets: &[String]) -> Result<(), Self::Error> {
        let cache: Cache = settle(self.caches()?.open(bucket))
            .await?
            .dyn_into()
            .map_err(|_| format!("{bucket} did not open as a cache"))?;
        let urls = assets
            .iter()
            .map(|asset| JsValue::from_str(asset))
            .collect::<js_sys::Array>();
        settle(cache.add_all_with_str_sequence(&urls)).await?;
        Ok(())
    }

    async fn bucket_names(&self) -> Result<Vec<String>, Self::Error> {
        let keys: js_sys::Array = settle(self.caches()?.keys())
            .await?
            .dyn_into()
            .map_err(|_| "cache keys are not an array".to_string())?;
        Ok(keys.iter().filter_map(|key| key.as_string()).collect())
    }

    async fn delete_bucket(&self, bucket: &str) -> Result<bool, Self::Error> {
        let deleted = settle(self.caches()?.delete(bucket)).await?;
        Ok(deleted.as_bool().unwrap_or(false))
    }

    async fn lookup(&self, request: &Self::Request) -> Option<Self::Response> {
        let caches = self.caches().ok()?;
        settle(caches.match_with_request(request))
            .await
            .ok()?
            .dyn_into::<Response>()
            .ok()
    }

    async fn fetch_network(&self, request: &Self::Request) -> Result<Self::Response, Self::Error> {
        settle(self.scope.fetch_with_request(request))
            .await?
            .dyn_into::<Response>()
            .map_err(|_| "fetch did not yield a Response".to_string())
    }
}

/// Manifest the worker precaches, taken from the shipped config.
#[must_use]
pub fn worker_manifest() -> CacheManifest {
    crate::platform::load_app_config().cache
}

/// Precache the app shell; a rejection keeps the new worker from installing.
///
/// # Errors
/// Rejects when any asset cannot be cached.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub async fn worker_install() -> Result<(), JsValue> {
    crate::logging::init();
    let backend = BrowserCache::from_global().map_err(|err| JsValue::from_str(&err))?;
    let mut worker = OfflineCache::new(worker_manifest(), backend);
    worker
        .install()
        .await
        .map_err(|err| JsValue::from_str(&err.to_string()))
}

/// Delete caches left behind by older releases; resolves with the purged names.
///
/// # Errors
/// Rejects when the cache list cannot be read.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub async fn worker_activate() -> Result<JsValue, JsValue> {
    crate::logging::init();
    let backend = BrowserCache::from_global().map_err(|err| JsValue::from_str(&err))?;
    let mut worker = OfflineCache::resume_installed(worker_manifest(), backend);
    let purged = worker
        .activate()
        .await
        .map_err(|err| JsValue::from_str(&err.to_string()))?;
    Ok(purged
        .into_iter()
        .map(JsValue::from)
        .collect::<js_sys::Array>()
        .into())
}

/// Answer a fetch network first, then from cache; a network error response otherwise.
///
/// # Errors
/// Rejects only when not running inside a service worker.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub async fn worker_fetch(request: Request) -> Result<Response, JsValue> {
    let backend = BrowserCache::from_global().map_err(|err| JsValue::from_str(&err))?;
    let worker = OfflineCache::resume_installed(worker_manifest(), backend);
    Ok(worker
        .handle_fetch(&request)
        .await
        .unwrap_or_else(Response::error))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::offline::CACHE_NAME;

    #[test]
    fn worker_manifest_comes_from_shipped_config() {
        let manifest = worker_manifest();
        assert_eq!(manifest.bucket, CACHE_NAME);
        for asset in ["./index.html", "./whatif_web_bg.wasm", "./scenarios.json"] {
            assert!(manifest.assets.iter().any(|a| a == asset), "{asset} not precached");
        }
    }
}
