//! Cursor-based browsing session over the scenario collection.
//!
//! `next`/`previous` move cyclically through the working set, which is always
//! available regardless of the active filter. The history policy only drives
//! the explicit `history_forward`/`history_back` operations.

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use std::rc::Rc;

use crate::catalog::{ScenarioId, ScenarioRecord, ScenarioStore};
use crate::category::CategoryFilter;
use crate::daily::DailySelection;
use crate::error::NavigationError;
use crate::history::{HistoryPolicy, LinearHistory, ViewHistory};
use crate::route::{self, Route};
use crate::session::{SESSION_VERSION, SessionSnapshot};
use crate::theme::Theme;

/// Construction parameters for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationOptions {
    pub policy: HistoryPolicy,
    /// Seed for the random draws of the history policy.
    pub seed: u64,
    /// Wall-clock time used for the daily pick.
    pub now_ms: i64,
}

impl Default for NavigationOptions {
    fn default() -> Self {
        Self {
            policy: HistoryPolicy::Linear,
            seed: 0,
            now_ms: 0,
        }
    }
}

/// Side effects requested by mutating operations, drained by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingEffects {
    /// The session snapshot changed and should be flushed.
    pub persist: bool,
    /// Fragment that should replace (not push) the current history entry.
    pub replace_route: Option<String>,
}

impl PendingEffects {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.persist && self.replace_route.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct NavigationController {
    store: Rc<ScenarioStore>,
    category: CategoryFilter,
    working_set: Vec<ScenarioId>,
    cursor: Option<usize>,
    daily: Option<DailySelection>,
    history: ViewHistory,
    theme: Theme,
    rng: ChaCha20Rng,
    effects: PendingEffects,
}

impl NavigationController {
    /// Fresh session showing the first scenario of the full collection.
    #[must_use]
    pub fn new(store: Rc<ScenarioStore>, options: NavigationOptions) -> Self {
        let daily = DailySelection::compute(&store, options.now_ms).ok();
        let mut controller = Self {
            working_set: store.filter_ids(&CategoryFilter::All),
            store,
            category: CategoryFilter::All,
            cursor: None,
            daily,
            history: ViewHistory::for_policy(options.policy),
            theme: Theme::default(),
            rng: ChaCha20Rng::seed_from_u64(options.seed),
            effects: PendingEffects::default(),
        };
        controller.cursor = (!controller.working_set.is_empty()).then_some(0);
        if let Some(id) = controller.current_id() {
            controller.history.record(id);
        }
        controller
    }

    /// Resume from a persisted snapshot, repairing anything that no longer
    /// matches the loaded collection.
    #[must_use]
    pub fn restore(
        store: Rc<ScenarioStore>,
        snapshot: SessionSnapshot,
        options: NavigationOptions,
    ) -> Self {
        let mut controller = Self::new(store, options);
        controller.theme = snapshot.theme;

        let mut history = snapshot.history;
        if history.policy() == options.policy {
            let known = Rc::clone(&controller.store);
            history.retain(|id| known.contains(id));
            if let ViewHistory::Linear(trail) = &history {
                history = ViewHistory::Linear(LinearHistory::from_parts(
                    trail.visited().to_vec(),
                    trail.pointer(),
                ));
            }
            controller.history = history;
        } else {
            log::debug!(
                "persisted history uses {:?}, session runs {:?}; starting fresh",
                history.policy(),
                options.policy
            );
        }

        let working_set = controller.store.filter_ids(&snapshot.category);
        if !working_set.is_empty() {
            controller.category = snapshot.category;
            controller.working_set = working_set;
            controller.cursor = Some(0);
        }
        if let Some(id) = snapshot.current_id
            && controller.store.contains(id)
        {
            controller.select(id);
        }
        if let Some(id) = controller.current_id() {
            controller.history.record(id);
        }
        controller.effects = PendingEffects::default();
        controller
    }

    fn rebuild_working_set(&mut self, category: CategoryFilter) {
        self.working_set = self.store.filter_ids(&category);
        self.category = category;
        self.cursor = (!self.working_set.is_empty()).then_some(0);
    }

    /// Position the cursor on `id`, widening the filter when it is hidden.
    /// The caller guarantees `id` exists in the store.
    fn select(&mut self, id: ScenarioId) {
        if let Some(pos) = self.position_in_working_set(id) {
            self.cursor = Some(pos);
        } else {
            self.rebuild_working_set(CategoryFilter::All);
            self.cursor = self.position_in_working_set(id);
        }
    }

    fn position_in_working_set(&self, id: ScenarioId) -> Option<usize> {
        self.working_set.iter().position(|candidate| *candidate == id)
    }

    fn mark_changed(&mut self) {
        self.effects.persist = true;
        if let Some(id) = self.current_id() {
            self.effects.replace_route = Some(route::encode(id));
        }
    }

    fn settle(&mut self, record: bool) -> Result<ScenarioId, NavigationError> {
        let id = self.current_id().ok_or(NavigationError::EmptyCollection)?;
        if record {
            self.history.record(id);
        }
        self.mark_changed();
        Ok(id)
    }

    /// Apply a category filter; the cursor returns to the first match.
    pub fn set_category(&mut self, category: CategoryFilter) -> Option<ScenarioId> {
        log::debug!("category -> {category}");
        self.rebuild_working_set(category);
        let current = self.current_id();
        if let Some(id) = current {
            self.history.record(id);
        }
        self.mark_changed();
        current
    }

    /// Advance with wraparound.
    ///
    /// # Errors
    ///
    /// Returns [`NavigationError::EmptyCollection`] when the working set is empty.
    pub fn next(&mut self) -> Result<ScenarioId, NavigationError> {
        self.step(1)
    }

    /// Retreat with wraparound.
    ///
    /// # Errors
    ///
    /// Returns [`NavigationError::EmptyCollection`] when the working set is empty.
    pub fn previous(&mut self) -> Result<ScenarioId, NavigationError> {
        self.step(-1)
    }

    fn step(&mut self, delta: isize) -> Result<ScenarioId, NavigationError> {
        let len = self.working_set.len();
        let cursor = self.cursor.ok_or(NavigationError::EmptyCollection)?;
        if len == 0 {
            return Err(NavigationError::EmptyCollection);
        }
        let next = if delta >= 0 {
            (cursor + delta.unsigned_abs()) % len
        } else {
            (cursor + len - delta.unsigned_abs() % len) % len
        };
        self.cursor = Some(next);
        self.settle(true)
    }

    /// Show `id`, clearing the filter if it hides the scenario.
    ///
    /// # Errors
    ///
    /// Returns [`NavigationError::NotFound`] without touching state when the id
    /// is not part of the collection.
    pub fn jump_to_id(&mut self, id: ScenarioId) -> Result<ScenarioId, NavigationError> {
        if !self.store.contains(id) {
            log::debug!("ignoring jump to unknown scenario {id}");
            return Err(NavigationError::NotFound(id));
        }
        self.select(id);
        self.settle(true)
    }

    /// Show today's scenario in the unfiltered view.
    ///
    /// # Errors
    ///
    /// Returns [`NavigationError::EmptyCollection`] when no daily pick exists.
    pub fn jump_to_daily(&mut self) -> Result<ScenarioId, NavigationError> {
        let id = self
            .daily
            .map(|daily| daily.scenario_id)
            .ok_or(NavigationError::EmptyCollection)?;
        if !self.category.is_all() {
            self.rebuild_working_set(CategoryFilter::All);
        }
        self.jump_to_id(id)
    }

    /// Act on a decoded URL fragment.
    ///
    /// # Errors
    ///
    /// Propagates the error of the underlying jump.
    pub fn apply_route(&mut self, route: Route) -> Result<ScenarioId, NavigationError> {
        match route {
            Route::Scenario(id) => self.jump_to_id(id),
            Route::Daily => self.jump_to_daily(),
        }
    }

    /// Move forward through the history; at its end (or under the draw
    /// policy) a new scenario is drawn from the working set.
    ///
    /// # Errors
    ///
    /// Returns [`NavigationError::EmptyCollection`] when nothing can be drawn.
    pub fn history_forward(&mut self) -> Result<ScenarioId, NavigationError> {
        let current = self.current_id();
        let next = match &mut self.history {
            ViewHistory::Linear(trail) => trail.advance(&self.working_set, &mut self.rng),
            ViewHistory::Draw(pool) => pool.draw_next(&self.working_set, current, &mut self.rng),
        }
        .ok_or(NavigationError::EmptyCollection)?;
        self.select(next);
        self.settle(false)
    }

    /// Move back through the history.
    ///
    /// # Errors
    ///
    /// Returns [`NavigationError::Unsupported`] under the draw policy or when
    /// the trail is already at its first entry.
    pub fn history_back(&mut self) -> Result<ScenarioId, NavigationError> {
        let previous = match &mut self.history {
            ViewHistory::Linear(trail) => trail
                .retreat()
                .ok_or(NavigationError::Unsupported("already at the oldest entry"))?,
            ViewHistory::Draw(pool) => pool.retreat()?,
        };
        self.select(previous);
        self.settle(false)
    }

    #[must_use]
    pub fn current(&self) -> Option<&ScenarioRecord> {
        self.current_id().and_then(|id| self.store.find_by_id(id))
    }

    #[must_use]
    pub fn current_id(&self) -> Option<ScenarioId> {
        self.cursor.and_then(|c| self.working_set.get(c).copied())
    }

    #[must_use]
    pub fn is_current_daily(&self) -> bool {
        matches!(
            (self.current_id(), self.daily),
            (Some(id), Some(daily)) if id == daily.scenario_id
        )
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.effects.persist = true;
        self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        if self.theme != theme {
            self.theme = theme;
            self.effects.persist = true;
        }
    }

    #[must_use]
    pub const fn theme(&self) -> Theme {
        self.theme
    }

    #[must_use]
    pub const fn category(&self) -> &CategoryFilter {
        &self.category
    }

    #[must_use]
    pub fn working_set(&self) -> &[ScenarioId] {
        &self.working_set
    }

    #[must_use]
    pub const fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    #[must_use]
    pub const fn daily(&self) -> Option<DailySelection> {
        self.daily
    }

    #[must_use]
    pub const fn history(&self) -> &ViewHistory {
        &self.history
    }

    #[must_use]
    pub fn store(&self) -> &ScenarioStore {
        &self.store
    }

    /// Whether `history_back` can succeed right now.
    #[must_use]
    pub fn can_go_back(&self) -> bool {
        match &self.history {
            ViewHistory::Linear(trail) => trail.pointer().is_some_and(|p| p > 0),
            ViewHistory::Draw(_) => false,
        }
    }

    /// Route describing the current position, if any.
    #[must_use]
    pub fn route(&self) -> Option<Route> {
        self.current_id().map(Route::Scenario)
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            version: SESSION_VERSION,
            category: self.category.clone(),
            current_id: self.current_id(),
            theme: self.theme,
            history: self.history.clone(),
        }
    }

    /// Drain the side effects accumulated since the last call.
    pub fn take_effects(&mut self) -> PendingEffects {
        std::mem::take(&mut self.effects)
    }
}

/// Build the startup session: resume the snapshot if any, then let a URL
/// route override the resumed position.
#[must_use]
pub fn start_session(
    store: Rc<ScenarioStore>,
    snapshot: Option<SessionSnapshot>,
    route: Option<Route>,
    options: NavigationOptions,
) -> NavigationController {
    let mut controller = match snapshot {
        Some(snapshot) => NavigationController::restore(store, snapshot, options),
        None => NavigationController::new(store, options),
    };
    if let Some(route) = route
        && let Err(err) = controller.apply_route(route)
    {
        log::debug!("route {} ignored: {err}", route.fragment());
    }
    controller
}
