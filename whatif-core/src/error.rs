//! Error taxonomy shared by the core components.
//!
//! Every variant here has a local recovery path; none of them is meant to
//! bubble up to the user as a crash.

use thiserror::Error;

use crate::catalog::ScenarioId;

/// Failure to obtain a usable scenario collection.
///
/// Callers recover by substituting [`crate::ScenarioStore::bundled`].
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("scenario source unreachable: {0}")]
    Unreachable(String),
    #[error("scenario document could not be parsed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("scenario id {0} appears more than once")]
    DuplicateId(ScenarioId),
}

/// Outcome of a navigation request that could not yield a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("no scenarios available")]
    EmptyCollection,
    #[error("scenario {0} does not exist")]
    NotFound(ScenarioId),
    #[error("operation not supported by this history policy: {0}")]
    Unsupported(&'static str),
}

/// Failure to read or write the persisted session snapshot.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("persisted session is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("persisted session has version {found}, expected {expected}")]
    VersionMismatch { found: u32, expected: u32 },
    #[error("key-value store failure: {0}")]
    Store(String),
}

/// Service worker lifecycle or cache failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkerError {
    #[error("cannot {action} while {phase}")]
    InvalidTransition {
        action: &'static str,
        phase: &'static str,
    },
    #[error("cache operation failed: {0}")]
    Cache(String),
}

/// Application configuration could not be parsed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config JSON is invalid: {0}")]
    Parse(#[from] serde_json::Error),
}
