use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use std::path::PathBuf;
use thiserror::Error;
use whatif_core::{ScenarioSource, ScenarioStore};

/// Scenario document shipped with the web front end.
const SHIPPED_SCENARIOS: &str = include_str!("../../../whatif-web/static/data/scenarios.json");

#[derive(Debug, Error)]
#[error("could not read {path}: {source}")]
pub struct DataFileError {
    path: String,
    #[source]
    source: std::io::Error,
}

/// Scenario document on disk, or the shipped copy when no path is given.
#[derive(Debug, Clone, Default)]
pub struct DataFile {
    path: Option<PathBuf>,
}

impl DataFile {
    pub const fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    pub fn label(&self) -> String {
        self.path
            .as_ref()
            .map_or_else(|| "shipped scenarios".to_string(), |p| p.display().to_string())
    }

    /// Load the collection strictly; a broken document is a test failure, not
    /// a reason to fall back.
    pub fn load_store(&self) -> Result<ScenarioStore> {
        let store = ScenarioStore::load(self).with_context(|| format!("loading {}", self.label()))?;
        anyhow::ensure!(!store.is_empty(), "{} holds no scenarios", self.label());
        Ok(store)
    }
}

impl ScenarioSource for DataFile {
    type Error = DataFileError;

    fn fetch_document(&self) -> Result<String, Self::Error> {
        match &self.path {
            Some(path) => std::fs::read_to_string(path).map_err(|source| DataFileError {
                path: path.display().to_string(),
                source,
            }),
            None => Ok(SHIPPED_SCENARIOS.to_string()),
        }
    }
}

/// Noon UTC of `YYYY-MM-DD` in epoch milliseconds; `None` means now.
pub fn parse_date_ms(raw: Option<&str>) -> Result<i64> {
    let Some(raw) = raw else {
        return Ok(Utc::now().timestamp_millis());
    };
    let date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .with_context(|| format!("invalid date '{raw}', expected YYYY-MM-DD"))?;
    let noon = date
        .and_hms_opt(12, 0, 0)
        .with_context(|| format!("no noon on {raw}"))?;
    Ok(noon.and_utc().timestamp_millis())
}

pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}
