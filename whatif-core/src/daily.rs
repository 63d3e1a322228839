//! Deterministic "scenario of the day".
//!
//! The pick depends only on the UTC day number and the unfiltered collection
//! order, so every visitor sees the same card for the whole day.

use serde::{Deserialize, Serialize};

use crate::catalog::{ScenarioId, ScenarioStore};
use crate::error::NavigationError;

/// Milliseconds in one UTC day.
pub const DAY_MS: i64 = 86_400_000;

/// Day number since the Unix epoch for a millisecond timestamp.
#[must_use]
pub const fn date_code(now_ms: i64) -> i64 {
    now_ms.div_euclid(DAY_MS)
}

/// Pick today's scenario from the full collection.
///
/// # Errors
///
/// Returns [`NavigationError::EmptyCollection`] when the store holds no records.
pub fn pick_daily(store: &ScenarioStore, now_ms: i64) -> Result<ScenarioId, NavigationError> {
    DailySelection::compute(store, now_ms).map(|selection| selection.scenario_id)
}

/// Result of the daily pick, kept for the whole session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySelection {
    pub date_code: i64,
    pub scenario_id: ScenarioId,
}

impl DailySelection {
    /// # Errors
    ///
    /// Returns [`NavigationError::EmptyCollection`] when the store holds no records.
    pub fn compute(store: &ScenarioStore, now_ms: i64) -> Result<Self, NavigationError> {
        let len = i64::try_from(store.len()).map_err(|_| NavigationError::EmptyCollection)?;
        if len == 0 {
            return Err(NavigationError::EmptyCollection);
        }
        let code = date_code(now_ms);
        let index = usize::try_from(code.rem_euclid(len))
            .map_err(|_| NavigationError::EmptyCollection)?;
        let record = store.get(index).ok_or(NavigationError::EmptyCollection)?;
        Ok(Self {
            date_code: code,
            scenario_id: record.id,
        })
    }

    /// Whether this selection is still valid at `now_ms`.
    #[must_use]
    pub const fn is_current(&self, now_ms: i64) -> bool {
        self.date_code == date_code(now_ms)
    }
}
