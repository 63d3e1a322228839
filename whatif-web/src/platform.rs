//! Web-specific engine wiring
//!
//! Provides the browser implementations of the whatif-core traits and
//! re-exports the core types.

pub use whatif_core::*;

use once_cell::sync::Lazy;

static APP_CONFIG: Lazy<AppConfig> = Lazy::new(|| {
    AppConfig::from_json(include_str!("../static/data/config.json")).unwrap_or_else(|err| {
        log::warn!("config.json unusable ({err}); using defaults");
        AppConfig::default_config()
    })
});

/// Deployment config compiled into the bundle; missing or broken falls back to defaults.
#[must_use]
pub fn load_app_config() -> AppConfig {
    APP_CONFIG.clone()
}

#[derive(Debug, thiserror::Error)]
pub enum WebDataError {
    #[error("Network error: {0}")]
    Network(String),
}

/// Scenario document already fetched by the async bootstrap.
///
/// Fetching is asynchronous in the browser, so the bootstrap awaits it first
/// and hands the outcome to the synchronous engine through this source.
#[derive(Debug)]
pub struct FetchedDocument(Result<String, String>);

impl FetchedDocument {
    #[must_use]
    pub const fn ok(text: String) -> Self {
        Self(Ok(text))
    }

    #[must_use]
    pub const fn failed(reason: String) -> Self {
        Self(Err(reason))
    }
}

impl ScenarioSource for FetchedDocument {
    type Error = WebDataError;

    fn fetch_document(&self) -> Result<String, Self::Error> {
        self.0.clone().map_err(WebDataError::Network)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shipped_config_parses() {
        let cfg = load_app_config();
        let shipped = AppConfig::from_json(include_str!("../static/data/config.json")).unwrap();
        assert_eq!(cfg, shipped);
        assert_eq!(cfg.cache.bucket, offline::CACHE_NAME);
    }

    #[test]
    fn fetched_document_reports_network_failures() {
        let err = ScenarioStore::load(&FetchedDocument::failed("HTTP 404".into())).unwrap_err();
        assert!(err.to_string().contains("HTTP 404"));
        let store = ScenarioStore::load(&FetchedDocument::ok(
            include_str!("../static/data/scenarios.json").to_string(),
        ))
        .unwrap();
        assert!(store.len() >= 10);
    }
}
