//! Offline caching policy of the service worker.
//!
//! The worker precaches a fixed app-shell manifest into one versioned bucket,
//! purges every other bucket on activation and answers fetches network first,
//! falling back to the cached copy.

use serde::{Deserialize, Serialize};

use crate::error::WorkerError;

/// Bucket name of the current release; bump it to invalidate old assets.
pub const CACHE_NAME: &str = "what-if-v2-cache";

/// App-shell assets required to start offline.
pub const APP_SHELL_ASSETS: [&str; 6] = [
    "./",
    "./index.html",
    "./styles.css",
    "./whatif_web.js",
    "./whatif_web_bg.wasm",
    "./scenarios.json",
];

/// Named bucket plus the assets precached into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheManifest {
    pub bucket: String,
    pub assets: Vec<String>,
}

impl Default for CacheManifest {
    fn default() -> Self {
        Self {
            bucket: CACHE_NAME.to_string(),
            assets: APP_SHELL_ASSETS.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Lifecycle phase of the worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkerPhase {
    #[default]
    Installing,
    /// Installed and waiting for the previous worker to release its clients.
    Installed,
    Active,
    /// Installation failed; this worker will never control a page.
    Redundant,
}

impl WorkerPhase {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Installing => "installing",
            Self::Installed => "installed",
            Self::Active => "active",
            Self::Redundant => "redundant",
        }
    }
}

/// Buckets that do not belong to the current release.
#[must_use]
pub fn stale_buckets<'a>(existing: &'a [String], current: &str) -> Vec<&'a str> {
    existing
        .iter()
        .map(String::as_str)
        .filter(|name| *name != current)
        .collect()
}

/// Platform cache + network primitives the policy runs on.
#[allow(async_fn_in_trait)]
pub trait CacheBackend {
    type Request;
    type Response;
    type Error: std::fmt::Display;

    /// Fetch every asset and store it in `bucket`; all or nothing.
    async fn put_all(&self, bucket: &str, assets: &[String]) -> Result<(), Self::Error>;

    async fn bucket_names(&self) -> Result<Vec<String>, Self::Error>;

    async fn delete_bucket(&self, bucket: &str) -> Result<bool, Self::Error>;

    /// Cached response for `request` in any bucket.
    async fn lookup(&self, request: &Self::Request) -> Option<Self::Response>;

    async fn fetch_network(&self, request: &Self::Request)
    -> Result<Self::Response, Self::Error>;
}

/// Service worker state machine over a [`CacheBackend`].
#[derive(Debug)]
pub struct OfflineCache<B: CacheBackend> {
    manifest: CacheManifest,
    phase: WorkerPhase,
    backend: B,
}

impl<B: CacheBackend> OfflineCache<B> {
    pub fn new(manifest: CacheManifest, backend: B) -> Self {
        Self {
            manifest,
            phase: WorkerPhase::Installing,
            backend,
        }
    }

    /// Pick up a worker the browser restarted after a successful install.
    pub fn resume_installed(manifest: CacheManifest, backend: B) -> Self {
        Self {
            manifest,
            phase: WorkerPhase::Installed,
            backend,
        }
    }

    #[must_use]
    pub const fn phase(&self) -> WorkerPhase {
        self.phase
    }

    #[must_use]
    pub const fn manifest(&self) -> &CacheManifest {
        &self.manifest
    }

    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Precache the manifest into the current bucket.
    ///
    /// # Errors
    ///
    /// Fails when called outside the installing phase or when any asset cannot
    /// be stored; the worker then becomes redundant.
    pub async fn install(&mut self) -> Result<(), WorkerError> {
        if self.phase != WorkerPhase::Installing {
            return Err(WorkerError::InvalidTransition {
                action: "install",
                phase: self.phase.label(),
            });
        }
        match self
            .backend
            .put_all(&self.manifest.bucket, &self.manifest.assets)
            .await
        {
            Ok(()) => {
                log::info!(
                    "precached {} assets into {}",
                    self.manifest.assets.len(),
                    self.manifest.bucket
                );
                self.phase = WorkerPhase::Installed;
                Ok(())
            }
            Err(err) => {
                self.phase = WorkerPhase::Redundant;
                Err(WorkerError::Cache(err.to_string()))
            }
        }
    }

    /// Delete every bucket except the current one; returns the purged names.
    ///
    /// # Errors
    ///
    /// Fails when the worker is not installed or the bucket list cannot be read.
    pub async fn activate(&mut self) -> Result<Vec<String>, WorkerError> {
        if self.phase != WorkerPhase::Installed {
            return Err(WorkerError::InvalidTransition {
                action: "activate",
                phase: self.phase.label(),
            });
        }
        let existing = self
            .backend
            .bucket_names()
            .await
            .map_err(|err| WorkerError::Cache(err.to_string()))?;
        let mut purged = Vec::new();
        for name in stale_buckets(&existing, &self.manifest.bucket) {
            match self.backend.delete_bucket(name).await {
                Ok(true) => purged.push(name.to_string()),
                Ok(false) => {}
                Err(err) => log::warn!("could not delete cache {name}: {err}"),
            }
        }
        self.phase = WorkerPhase::Active;
        log::info!("activated {}, purged {:?}", self.manifest.bucket, purged);
        Ok(purged)
    }

    /// Network first, cached copy on failure, `None` when neither is available.
    pub async fn handle_fetch(&self, request: &B::Request) -> Option<B::Response> {
        match self.backend.fetch_network(request).await {
            Ok(response) => Some(response),
            Err(err) => {
                log::debug!("network failed ({err}), trying cache");
                self.backend.lookup(request).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use std::cell::{Cell, RefCell};
    use std::collections::{BTreeMap, BTreeSet};

    /// Buckets keyed by name, each holding url -> body.
    #[derive(Default)]
    struct FakeBackend {
        buckets: RefCell<BTreeMap<String, BTreeMap<String, String>>>,
        online: Cell<bool>,
        missing: BTreeSet<String>,
    }

    impl FakeBackend {
        fn online() -> Self {
            let backend = Self::default();
            backend.online.set(true);
            backend
        }
    }

    impl CacheBackend for FakeBackend {
        type Request = String;
        type Response = String;
        type Error = String;

        async fn put_all(&self, bucket: &str, assets: &[String]) -> Result<(), Self::Error> {
            if let Some(missing) = assets.iter().find(|a| self.missing.contains(*a)) {
                return Err(format!("404 for {missing}"));
            }
            let mut buckets = self.buckets.borrow_mut();
            let entry = buckets.entry(bucket.to_string()).or_default();
            for asset in assets {
                entry.insert(asset.clone(), format!("cached {asset}"));
            }
            Ok(())
        }

        async fn bucket_names(&self) -> Result<Vec<String>, Self::Error> {
            Ok(self.buckets.borrow().keys().cloned().collect())
        }

        async fn delete_bucket(&self, bucket: &str) -> Result<bool, Self::Error> {
            Ok(self.buckets.borrow_mut().remove(bucket).is_some())
        }

        async fn lookup(&self, request: &Self::Request) -> Option<String> {
            self.buckets
                .borrow()
                .values()
                .find_map(|bucket| bucket.get(request).cloned())
        }

        async fn fetch_network(&self, request: &Self::Request) -> Result<String, Self::Error> {
            if self.online.get() {
                Ok(format!("fresh {request}"))
            } else {
                Err("offline".to_string())
            }
        }
    }

    #[test]
    fn install_precaches_every_asset() {
        let mut worker = OfflineCache::new(CacheManifest::default(), FakeBackend::online());
        block_on(worker.install()).unwrap();
        assert_eq!(worker.phase(), WorkerPhase::Installed);
        let buckets = worker.backend().buckets.borrow();
        let bucket = buckets.get(CACHE_NAME).unwrap();
        for asset in APP_SHELL_ASSETS {
            assert!(bucket.contains_key(asset), "{asset} missing");
        }
    }

    #[test]
    fn failed_install_makes_worker_redundant() {
        let mut backend = FakeBackend::online();
        backend.missing.insert("./styles.css".to_string());
        let mut worker = OfflineCache::new(CacheManifest::default(), backend);
        assert!(matches!(
            block_on(worker.install()),
            Err(WorkerError::Cache(msg)) if msg.contains("styles.css")
        ));
        assert_eq!(worker.phase(), WorkerPhase::Redundant);
        assert!(matches!(
            block_on(worker.activate()),
            Err(WorkerError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn activate_after_version_bump_keeps_only_current_bucket() {
        let backend = FakeBackend::online();
        block_on(backend.put_all("what-if-v1-cache", &["./".to_string()])).unwrap();
        block_on(backend.put_all("unrelated-old", &["./x".to_string()])).unwrap();

        let mut worker = OfflineCache::new(CacheManifest::default(), backend);
        assert!(matches!(
            block_on(worker.activate()),
            Err(WorkerError::InvalidTransition {
                action: "activate",
                phase: "installing"
            })
        ));
        block_on(worker.install()).unwrap();
        let purged = block_on(worker.activate()).unwrap();
        assert_eq!(
            purged,
            vec!["unrelated-old".to_string(), "what-if-v1-cache".to_string()]
        );
        assert_eq!(worker.phase(), WorkerPhase::Active);
        let names = block_on(worker.backend().bucket_names()).unwrap();
        assert_eq!(names, vec![CACHE_NAME.to_string()]);
    }

    #[test]
    fn fetch_prefers_network_then_cache_then_nothing() {
        let mut worker = OfflineCache::new(CacheManifest::default(), FakeBackend::online());
        block_on(worker.install()).unwrap();

        let shell = "./index.html".to_string();
        assert_eq!(
            block_on(worker.handle_fetch(&shell)).as_deref(),
            Some("fresh ./index.html")
        );

        worker.backend().online.set(false);
        assert_eq!(
            block_on(worker.handle_fetch(&shell)).as_deref(),
            Some("cached ./index.html")
        );
        assert_eq!(block_on(worker.handle_fetch(&"./other.png".to_string())), None);
    }

    #[test]
    fn restarted_worker_can_still_activate() {
        let backend = FakeBackend::online();
        block_on(backend.put_all(CACHE_NAME, &["./".to_string()])).unwrap();
        block_on(backend.put_all("what-if-v1-cache", &["./".to_string()])).unwrap();
        let mut worker = OfflineCache::resume_installed(CacheManifest::default(), backend);
        assert_eq!(worker.phase(), WorkerPhase::Installed);
        assert_eq!(
            block_on(worker.activate()).unwrap(),
            vec!["what-if-v1-cache".to_string()]
        );
    }

    #[test]
    fn stale_bucket_filter_skips_current() {
        let existing = vec!["a".to_string(), CACHE_NAME.to_string(), "b".to_string()];
        assert_eq!(stale_buckets(&existing, CACHE_NAME), vec!["a", "b"]);
    }
}
