use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::history::HistoryPolicy;
use crate::offline::CacheManifest;
use crate::session::SESSION_KEY;
use crate::theme::Theme;

fn default_scenarios_file() -> String {
    "scenarios.json".to_string()
}

fn default_storage_key() -> String {
    SESSION_KEY.to_string()
}

const fn default_fetch_timeout_ms() -> u32 {
    8_000
}

/// Deployment settings shared by the web front end and the worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Scenario document, relative to the deployment base path.
    #[serde(default = "default_scenarios_file")]
    pub scenarios_file: String,
    #[serde(default)]
    pub default_theme: Theme,
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    #[serde(default)]
    pub history_policy: HistoryPolicy,
    /// Give up on the scenario fetch after this long and use the bundled set.
    #[serde(default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u32,
    #[serde(default)]
    pub cache: CacheManifest,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::default_config()
    }
}

impl AppConfig {
    #[must_use]
    pub fn default_config() -> Self {
        Self {
            scenarios_file: default_scenarios_file(),
            default_theme: Theme::Dark,
            storage_key: default_storage_key(),
            history_policy: HistoryPolicy::Linear,
            fetch_timeout_ms: default_fetch_timeout_ms(),
            cache: CacheManifest::default(),
        }
    }

    /// Parse a JSON config; missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a field has the wrong type.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}
