use anyhow::{Context, Result, ensure};
use futures::executor::block_on;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use super::{CheckCtx, TestScenario};
use whatif_core::category::KNOWN_CATEGORIES;
use whatif_core::route::{self, Route};
use whatif_core::session::SESSION_KEY;
use whatif_core::{
    AppConfig, CacheBackend, CategoryFilter, DAY_MS, DrawPool, HistoryPolicy, KeyValueStore,
    MemoryStore, NavigationError, OfflineCache, PersistedSession, ScenarioId, WorkerPhase,
    date_code, pick_daily, start_session,
};

pub fn catalog_scenarios() -> Vec<TestScenario> {
    vec![
        TestScenario::new("smoke", "Smoke Test", smoke),
        TestScenario::new("data-integrity", "Scenario Data Integrity", data_integrity),
        TestScenario::new("route-roundtrip", "Route Encoding and Deep Links", route_roundtrip),
        TestScenario::new("cyclic-navigation", "Cyclic Navigation per Category", cyclic_navigation),
        TestScenario::new("daily-rotation", "Scenario of the Day Rotation", daily_rotation),
        TestScenario::new("draw-coverage", "Draw Without Replacement Coverage", draw_coverage),
        TestScenario::new("history-walk", "Linear History Walk", history_walk),
        TestScenario::new("session-persistence", "Session Persistence", session_persistence),
        TestScenario::new("offline-lifecycle", "Offline Cache Lifecycle", offline_lifecycle),
    ]
}

pub fn alias(key: &str) -> Option<&'static str> {
    match key {
        "data-integrity" => Some("data"),
        "route-roundtrip" => Some("routes"),
        "cyclic-navigation" => Some("cycle"),
        "daily-rotation" => Some("daily"),
        "draw-coverage" => Some("draw"),
        "history-walk" => Some("history"),
        "session-persistence" => Some("session"),
        "offline-lifecycle" => Some("offline"),
        _ => None,
    }
}

fn smoke(ctx: &CheckCtx) -> Result<()> {
    let mut nav = ctx.session(HistoryPolicy::Linear);
    let first = nav.current_id().context("session opened without a scenario")?;
    let second = nav.next()?;
    let back = nav.previous()?;
    ensure!(back == first, "previous after next landed on {back}, expected {first}");
    if ctx.store.len() > 1 {
        ensure!(second != first, "next did not move away from {first}");
    }
    ensure!(
        nav.current().is_some_and(|record| !record.title.is_empty()),
        "current scenario has no title"
    );
    Ok(())
}

fn data_integrity(ctx: &CheckCtx) -> Result<()> {
    let mut problems = Vec::new();
    for record in ctx.store.records() {
        if record.title.trim().is_empty() {
            problems.push(format!("{} has no title", record.id));
        }
        if record.intro.trim().is_empty() {
            problems.push(format!("{} has no intro", record.id));
        }
        if !KNOWN_CATEGORIES.contains(&record.category.as_str()) {
            log::warn!(
                "{} uses unlisted category '{}', shown as {}",
                record.id,
                record.category,
                record.category_label()
            );
        }
    }
    ensure!(problems.is_empty(), "{}", problems.join("; "));
    Ok(())
}

fn route_roundtrip(ctx: &CheckCtx) -> Result<()> {
    for id in ctx.store.ids() {
        let fragment = route::encode(id);
        ensure!(
            route::decode(&fragment) == Some(Route::Scenario(id)),
            "{fragment} does not decode back to {id}"
        );
        let link = route::share_url("https://whatif.example", "/", id);
        ensure!(link.ends_with(&fragment), "share link {link} lost its fragment");

        let nav = start_session(
            Rc::clone(&ctx.store),
            None,
            route::decode(&fragment),
            ctx.options(HistoryPolicy::Linear),
        );
        ensure!(nav.current_id() == Some(id), "deep link {fragment} opened {:?}", nav.current_id());
    }

    let missing = ScenarioId(ctx.store.ids().map(|id| id.0).max().unwrap_or(0).saturating_add(1));
    let nav = start_session(
        Rc::clone(&ctx.store),
        None,
        Some(Route::Scenario(missing)),
        ctx.options(HistoryPolicy::Linear),
    );
    ensure!(
        nav.current_id() == ctx.store.get(0).map(|record| record.id),
        "unknown id {missing} moved the session"
    );
    Ok(())
}

fn cyclic_navigation(ctx: &CheckCtx) -> Result<()> {
    let mut filters = vec![CategoryFilter::All];
    filters.extend(
        ctx.store
            .categories()
            .into_iter()
            .map(|tag| CategoryFilter::Tag(tag.to_string())),
    );

    let mut nav = ctx.session(HistoryPolicy::Linear);
    for filter in filters {
        let start = nav
            .set_category(filter.clone())
            .with_context(|| format!("{filter} has no scenarios"))?;
        let len = nav.working_set().len();
        for _ in 0..len {
            nav.next()?;
            let record = nav.current().context("cursor left the collection")?;
            ensure!(
                filter.matches(&record.category),
                "{} escaped filter {filter}",
                record.id
            );
        }
        ensure!(nav.current_id() == Some(start), "{len} x next under {filter} did not cycle");
        for _ in 0..len {
            nav.previous()?;
        }
        ensure!(nav.current_id() == Some(start), "{len} x previous under {filter} did not cycle");
    }
    Ok(())
}

fn daily_rotation(ctx: &CheckCtx) -> Result<()> {
    let store = &ctx.store;
    let code = date_code(ctx.now_ms);
    let midnight = code * DAY_MS;
    let today = pick_daily(store, ctx.now_ms)?;
    ensure!(pick_daily(store, midnight)? == today, "pick changed since midnight");
    ensure!(
        pick_daily(store, midnight + DAY_MS - 1)? == today,
        "pick changed before the day ended"
    );

    let len = i64::try_from(store.len())?;
    let expected = |code: i64| -> Result<ScenarioId> {
        let index = usize::try_from(code.rem_euclid(len))?;
        Ok(store.get(index).context("daily index out of range")?.id)
    };
    ensure!(today == expected(code)?, "day {code} picked {today}");
    let tomorrow = pick_daily(store, midnight + DAY_MS)?;
    ensure!(tomorrow == expected(code + 1)?, "day {} picked {tomorrow}", code + 1);

    let mut nav = ctx.session(HistoryPolicy::Linear);
    if let Some(tag) = store.categories().first() {
        nav.set_category(CategoryFilter::Tag((*tag).to_string()));
    }
    ensure!(nav.jump_to_daily()? == today, "jump to daily missed {today}");
    ensure!(nav.category().is_all(), "daily jump kept filter {}", nav.category());
    ensure!(nav.is_current_daily(), "daily scenario not flagged");
    Ok(())
}

fn draw_coverage(ctx: &CheckCtx) -> Result<()> {
    let ids: Vec<ScenarioId> = ctx.store.ids().collect();
    let mut rng = ChaCha20Rng::seed_from_u64(ctx.seed);
    let mut pool = DrawPool::new();
    let mut current = None;
    let mut drawn = BTreeSet::new();
    for _ in 0..ids.len() {
        current = pool.draw_next(&ids, current, &mut rng);
        drawn.extend(current);
    }
    ensure!(
        drawn.len() == ids.len(),
        "{} draws covered only {} scenarios",
        ids.len(),
        drawn.len()
    );

    let mut nav = ctx.session(HistoryPolicy::Draw);
    let mut on_screen = nav.current_id();
    for _ in 0..ids.len() {
        let id = nav.history_forward()?;
        ensure!(
            ids.len() == 1 || Some(id) != on_screen,
            "random draw repeated scenario {id} already on screen"
        );
        ensure!(nav.history().has_seen(id), "drawn scenario {id} not remembered");
        on_screen = Some(id);
    }
    ensure!(
        nav.history().seen_count() == ids.len(),
        "draw session saw {} of {} scenarios",
        nav.history().seen_count(),
        ids.len()
    );
    ensure!(
        matches!(nav.history_back(), Err(NavigationError::Unsupported(_))),
        "draw history allowed going back"
    );
    Ok(())
}

fn history_walk(ctx: &CheckCtx) -> Result<()> {
    let len = ctx.store.len();
    if len < 2 {
        return Ok(());
    }
    let mut rng = ChaCha20Rng::seed_from_u64(ctx.seed);
    let steps = rng.gen_range(1..len);

    let mut nav = ctx.session(HistoryPolicy::Linear);
    let mut trail = vec![nav.current_id().context("session opened without a scenario")?];
    for _ in 0..steps {
        trail.push(nav.history_forward()?);
    }
    let unique: BTreeSet<_> = trail.iter().collect();
    ensure!(unique.len() == trail.len(), "forward walk repeated a scenario: {trail:?}");

    for expected in trail.iter().rev().skip(1) {
        let got = nav.history_back()?;
        ensure!(got == *expected, "history back gave {got}, expected {expected}");
    }
    ensure!(nav.history_back().is_err(), "went back past the oldest entry");
    ensure!(nav.history_forward()? == trail[1], "forward after rewind left the trail");
    Ok(())
}

fn session_persistence(ctx: &CheckCtx) -> Result<()> {
    let kv = MemoryStore::new();
    let persisted = PersistedSession::new(kv.clone());
    let tags = ctx.store.categories();
    let mut rng = ChaCha20Rng::seed_from_u64(ctx.seed);

    let mut nav = ctx.session(HistoryPolicy::Linear);
    for _ in 0..6 {
        match rng.gen_range(0..4) {
            0 => {
                nav.next()?;
            }
            1 => {
                nav.previous()?;
            }
            2 => {
                let filter = match tags.get(rng.gen_range(0..=tags.len())) {
                    Some(tag) => CategoryFilter::Tag((*tag).to_string()),
                    None => CategoryFilter::All,
                };
                nav.set_category(filter);
            }
            _ => {
                nav.toggle_theme();
            }
        }
    }
    persisted.save(&nav.snapshot())?;

    let restored = start_session(
        Rc::clone(&ctx.store),
        persisted.load(),
        None,
        ctx.options(HistoryPolicy::Linear),
    );
    ensure!(restored.current_id() == nav.current_id(), "position lost on reload");
    ensure!(restored.category() == nav.category(), "filter lost on reload");
    ensure!(restored.theme() == nav.theme(), "theme lost on reload");

    kv.set(SESSION_KEY, "{broken")?;
    ensure!(persisted.load().is_none(), "corrupt snapshot was accepted");
    Ok(())
}

/// In-memory cache storage with a switchable network.
#[derive(Default)]
struct MemoryCache {
    buckets: RefCell<BTreeMap<String, BTreeSet<String>>>,
    online: Cell<bool>,
}

impl CacheBackend for MemoryCache {
    type Request = String;
    type Response = String;
    type Error = String;

    async fn put_all(&self, bucket: &str, assets: &[String]) -> Result<(), Self::Error> {
        if !self.online.get() {
            return Err("offline during install".to_string());
        }
        self.buckets
            .borrow_mut()
            .entry(bucket.to_string())
            .or_default()
            .extend(assets.iter().cloned());
        Ok(())
    }

    async fn bucket_names(&self) -> Result<Vec<String>, Self::Error> {
        Ok(self.buckets.borrow().keys().cloned().collect())
    }

    async fn delete_bucket(&self, bucket: &str) -> Result<bool, Self::Error> {
        Ok(self.buckets.borrow_mut().remove(bucket).is_some())
    }

    async fn lookup(&self, request: &String) -> Option<String> {
        self.buckets
            .borrow()
            .values()
            .any(|bucket| bucket.contains(request))
            .then(|| format!("cached {request}"))
    }

    async fn fetch_network(&self, request: &String) -> Result<String, Self::Error> {
        if self.online.get() {
            Ok(format!("network {request}"))
        } else {
            Err("offline".to_string())
        }
    }
}

fn offline_lifecycle(_ctx: &CheckCtx) -> Result<()> {
    let manifest = AppConfig::default().cache;
    let backend = MemoryCache::default();
    backend.online.set(true);
    backend
        .buckets
        .borrow_mut()
        .insert("what-if-v1-cache".to_string(), BTreeSet::new());

    let mut worker = OfflineCache::new(manifest.clone(), backend);
    block_on(worker.install())?;
    ensure!(worker.phase() == WorkerPhase::Installed, "install left {:?}", worker.phase());
    let purged = block_on(worker.activate())?;
    ensure!(purged == vec!["what-if-v1-cache".to_string()], "purged {purged:?}");

    let shell = manifest.assets.first().context("manifest lists no assets")?;
    let online = block_on(worker.handle_fetch(shell));
    ensure!(online.as_deref().is_some_and(|r| r.starts_with("network")), "online fetch {online:?}");

    worker.backend().online.set(false);
    let offline = block_on(worker.handle_fetch(shell));
    ensure!(offline.as_deref().is_some_and(|r| r.starts_with("cached")), "offline fetch {offline:?}");
    ensure!(
        block_on(worker.handle_fetch(&"./uncached.png".to_string())).is_none(),
        "uncached asset answered while offline"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use whatif_core::ScenarioStore;

    fn ctx(seed: u64) -> CheckCtx {
        let store = crate::common::DataFile::default()
            .load_store()
            .expect("shipped scenarios");
        CheckCtx {
            store: Rc::new(store),
            seed,
            now_ms: 19_000 * DAY_MS + 5,
        }
    }

    #[test]
    fn every_check_passes_on_shipped_data() {
        for seed in [1, 7, 1337] {
            let ctx = ctx(seed);
            for scenario in catalog_scenarios() {
                scenario
                    .run(&ctx)
                    .unwrap_or_else(|err| panic!("{} failed for seed {seed}: {err:#}", scenario.key));
            }
        }
    }

    #[test]
    fn single_record_collections_pass() {
        let store = ScenarioStore::from_json(r#"[{"id": 1, "category": "tech", "title": "Solo", "intro": "x"}]"#)
            .unwrap();
        let ctx = CheckCtx {
            store: Rc::new(store),
            seed: 3,
            now_ms: 0,
        };
        for scenario in catalog_scenarios() {
            scenario
                .run(&ctx)
                .unwrap_or_else(|err| panic!("{} failed: {err:#}", scenario.key));
        }
    }

    #[test]
    fn integrity_flags_untitled_records() {
        let store = ScenarioStore::from_json(r#"[{"id": 4, "category": "tech", "title": " ", "intro": "x"}]"#)
            .unwrap();
        let ctx = CheckCtx {
            store: Rc::new(store),
            seed: 0,
            now_ms: 0,
        };
        let err = data_integrity(&ctx).unwrap_err();
        assert!(err.to_string().contains("4 has no title"));
    }

    #[test]
    fn every_scenario_has_an_alias_except_smoke() {
        for scenario in catalog_scenarios() {
            assert_eq!(alias(scenario.key).is_none(), scenario.key == "smoke");
        }
    }
}
