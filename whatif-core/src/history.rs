//! View history policies.
//!
//! A session uses exactly one of the two policies for its whole lifetime:
//! [`LinearHistory`] keeps an ordered trail with a movable pointer, while
//! [`DrawPool`] remembers an unordered set of seen ids and draws the next card
//! without replacement.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::catalog::ScenarioId;
use crate::error::NavigationError;

/// Which history policy a session runs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryPolicy {
    #[default]
    Linear,
    Draw,
}

/// Uniform pick among `pool` members not in `visited`, or among the whole
/// pool when nothing unvisited remains.
fn draw_preferring_unvisited<R, F>(
    pool: &[ScenarioId],
    visited: F,
    rng: &mut R,
) -> Option<ScenarioId>
where
    R: Rng + ?Sized,
    F: Fn(ScenarioId) -> bool,
{
    if pool.is_empty() {
        return None;
    }
    let fresh: Vec<ScenarioId> = pool.iter().copied().filter(|id| !visited(*id)).collect();
    let candidates = if fresh.is_empty() { pool } else { &fresh };
    Some(candidates[rng.gen_range(0..candidates.len())])
}

/// Ordered trail of visited ids with a back/forward pointer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LinearHistory {
    visited: Vec<ScenarioId>,
    pointer: Option<usize>,
}

impl LinearHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted parts; an out-of-range pointer is clamped.
    #[must_use]
    pub fn from_parts(visited: Vec<ScenarioId>, pointer: Option<usize>) -> Self {
        let pointer = match (visited.len(), pointer) {
            (0, _) => None,
            (len, Some(p)) => Some(p.min(len - 1)),
            (len, None) => Some(len - 1),
        };
        Self { visited, pointer }
    }

    #[must_use]
    pub fn visited(&self) -> &[ScenarioId] {
        &self.visited
    }

    #[must_use]
    pub const fn pointer(&self) -> Option<usize> {
        self.pointer
    }

    #[must_use]
    pub fn current(&self) -> Option<ScenarioId> {
        self.pointer.and_then(|p| self.visited.get(p).copied())
    }

    #[must_use]
    pub fn is_at_end(&self) -> bool {
        self.pointer.is_none_or(|p| p + 1 >= self.visited.len())
    }

    /// Move to `id` if it was seen before, otherwise append it.
    pub fn jump_to(&mut self, id: ScenarioId) {
        if let Some(existing) = self.visited.iter().position(|v| *v == id) {
            self.pointer = Some(existing);
        } else {
            self.visited.push(id);
            self.pointer = Some(self.visited.len() - 1);
        }
    }

    /// Step forward; at the end of the trail, draw a new entry from `pool`.
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        pool: &[ScenarioId],
        rng: &mut R,
    ) -> Option<ScenarioId> {
        if !self.is_at_end() {
            self.pointer = self.pointer.map(|p| p + 1);
            return self.current();
        }
        let next = draw_preferring_unvisited(pool, |id| self.visited.contains(&id), rng)?;
        self.jump_to(next);
        Some(next)
    }

    /// Step back; `None` when already at the start.
    pub fn retreat(&mut self) -> Option<ScenarioId> {
        match self.pointer {
            Some(p) if p > 0 => {
                self.pointer = Some(p - 1);
                self.current()
            }
            _ => None,
        }
    }

    /// Drop ids that are no longer part of the collection.
    pub fn retain<F: Fn(ScenarioId) -> bool>(&mut self, keep: F) {
        let current = self.current();
        self.visited.retain(|id| keep(*id));
        self.pointer = match current.and_then(|id| self.visited.iter().position(|v| *v == id)) {
            Some(p) => Some(p),
            None if self.visited.is_empty() => None,
            None => Some(self.visited.len() - 1),
        };
    }
}

/// Set of seen ids for draw-without-replacement browsing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DrawPool {
    visited: BTreeSet<ScenarioId>,
}

impl DrawPool {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn visited(&self) -> &BTreeSet<ScenarioId> {
        &self.visited
    }

    pub fn mark(&mut self, id: ScenarioId) {
        self.visited.insert(id);
    }

    /// Draw uniformly among unvisited members of `pool` other than `current`.
    ///
    /// Once nothing unvisited remains the visited set is cleared and a new
    /// cycle starts; `current` is only drawn again when it is the sole member.
    pub fn draw_next<R: Rng + ?Sized>(
        &mut self,
        pool: &[ScenarioId],
        current: Option<ScenarioId>,
        rng: &mut R,
    ) -> Option<ScenarioId> {
        if pool.is_empty() {
            return None;
        }
        let on_screen = |id: ScenarioId| current == Some(id);
        let mut candidates: Vec<ScenarioId> = pool
            .iter()
            .copied()
            .filter(|id| !self.visited.contains(id) && !on_screen(*id))
            .collect();
        if candidates.is_empty() {
            log::debug!(
                "draw pool exhausted after {} ids, starting a new cycle",
                self.visited.len()
            );
            self.visited.clear();
            candidates = pool.iter().copied().filter(|id| !on_screen(*id)).collect();
            if candidates.is_empty() {
                candidates = pool.to_vec();
            }
        }
        let next = candidates[rng.gen_range(0..candidates.len())];
        self.mark(next);
        Some(next)
    }

    /// # Errors
    ///
    /// Always fails: an unordered pool has no previous entry.
    pub const fn retreat(&self) -> Result<ScenarioId, NavigationError> {
        Err(NavigationError::Unsupported("draw history cannot go back"))
    }

    pub fn retain<F: Fn(ScenarioId) -> bool>(&mut self, keep: F) {
        self.visited.retain(|id| keep(*id));
    }
}

/// History owned by a session, tagged by policy for persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum ViewHistory {
    Linear(LinearHistory),
    Draw(DrawPool),
}

impl ViewHistory {
    #[must_use]
    pub fn for_policy(policy: HistoryPolicy) -> Self {
        match policy {
            HistoryPolicy::Linear => Self::Linear(LinearHistory::new()),
            HistoryPolicy::Draw => Self::Draw(DrawPool::new()),
        }
    }

    #[must_use]
    pub const fn policy(&self) -> HistoryPolicy {
        match self {
            Self::Linear(_) => HistoryPolicy::Linear,
            Self::Draw(_) => HistoryPolicy::Draw,
        }
    }

    /// Record that `id` is now on screen. Only draws enter a [`DrawPool`], so
    /// cursor moves leave it untouched.
    pub fn record(&mut self, id: ScenarioId) {
        match self {
            Self::Linear(trail) => trail.jump_to(id),
            Self::Draw(_) => {}
        }
    }

    /// Number of distinct ids seen.
    #[must_use]
    pub fn seen_count(&self) -> usize {
        match self {
            Self::Linear(trail) => trail.visited().len(),
            Self::Draw(pool) => pool.visited().len(),
        }
    }

    #[must_use]
    pub fn has_seen(&self, id: ScenarioId) -> bool {
        match self {
            Self::Linear(trail) => trail.visited().contains(&id),
            Self::Draw(pool) => pool.visited().contains(&id),
        }
    }

    pub fn retain<F: Fn(ScenarioId) -> bool>(&mut self, keep: F) {
        match self {
            Self::Linear(trail) => trail.retain(keep),
            Self::Draw(pool) => pool.retain(keep),
        }
    }
}

impl Default for ViewHistory {
    fn default() -> Self {
        Self::for_policy(HistoryPolicy::default())
    }
}
