use crate::app::effects;
use crate::app::state::AppState;
use crate::input::KeyAction;
use crate::platform::{CategoryFilter, NavigationController, NavigationError, Route, ScenarioId};
use yew::prelude::*;

#[derive(Clone, PartialEq)]
pub struct AppHandlers {
    pub next: Callback<()>,
    pub previous: Callback<()>,
    pub daily: Callback<()>,
    pub history_forward: Callback<()>,
    pub history_back: Callback<()>,
    pub toggle_theme: Callback<()>,
    pub category: Callback<CategoryFilter>,
    pub route: Callback<Route>,
    pub share: Callback<()>,
    pub install: Callback<()>,
    pub dismiss_toast: Callback<()>,
}

impl AppHandlers {
    #[must_use]
    pub fn new(state: &AppState) -> Self {
        Self {
            next: build_step(state, NavigationController::next),
            previous: build_step(state, NavigationController::previous),
            daily: build_step(state, NavigationController::jump_to_daily),
            history_forward: build_step(state, NavigationController::history_forward),
            history_back: build_step(state, NavigationController::history_back),
            toggle_theme: build_toggle_theme(state),
            category: build_category(state),
            route: build_route(state),
            share: build_share(state),
            install: build_install(state),
            dismiss_toast: build_dismiss_toast(state),
        }
    }

    /// Callback bound to a keyboard shortcut.
    #[must_use]
    pub fn for_key(&self, action: KeyAction) -> &Callback<()> {
        match action {
            KeyAction::Next => &self.next,
            KeyAction::Previous => &self.previous,
            KeyAction::Daily => &self.daily,
            KeyAction::HistoryForward => &self.history_forward,
            KeyAction::HistoryBack => &self.history_back,
            KeyAction::ToggleTheme => &self.toggle_theme,
        }
    }
}

/// Clone the controller, apply `op`, flush its effects and publish the result.
fn update_session<T>(
    state: &AppState,
    op: impl Fn(&mut NavigationController) -> T + 'static,
) -> Callback<(), Option<T>> {
    let session = state.session.clone();
    let storage_key = state.config.storage_key.clone();
    Callback::from(move |()| {
        let mut nav = (*session).clone()?;
        let out = op(&mut nav);
        effects::commit(&mut nav, &storage_key);
        session.set(Some(nav));
        Some(out)
    })
}

fn build_step(
    state: &AppState,
    op: fn(&mut NavigationController) -> Result<ScenarioId, NavigationError>,
) -> Callback<()> {
    let apply = update_session(state, op);
    Callback::from(move |()| match apply.emit(()) {
        Some(Ok(_)) => effects::scroll_to_top(),
        Some(Err(err)) => log::debug!("navigation ignored: {err}"),
        None => {}
    })
}

fn build_toggle_theme(state: &AppState) -> Callback<()> {
    let apply = update_session(state, NavigationController::toggle_theme);
    Callback::from(move |()| {
        let _ = apply.emit(());
    })
}

fn build_category(state: &AppState) -> Callback<CategoryFilter> {
    let session = state.session.clone();
    let storage_key = state.config.storage_key.clone();
    Callback::from(move |filter: CategoryFilter| {
        let Some(mut nav) = (*session).clone() else {
            return;
        };
        nav.set_category(filter);
        effects::commit(&mut nav, &storage_key);
        session.set(Some(nav));
    })
}

fn build_route(state: &AppState) -> Callback<Route> {
    let session = state.session.clone();
    let storage_key = state.config.storage_key.clone();
    Callback::from(move |route: Route| {
        let Some(mut nav) = (*session).clone() else {
            return;
        };
        if let Err(err) = nav.apply_route(route) {
            log::debug!("route {} ignored: {err}", route.fragment());
            return;
        }
        effects::commit(&mut nav, &storage_key);
        session.set(Some(nav));
    })
}

fn build_share(state: &AppState) -> Callback<()> {
    let session = state.session.clone();
    let toast = state.toast.clone();
    Callback::from(move |()| {
        let Some(id) = (*session).as_ref().and_then(NavigationController::current_id) else {
            return;
        };
        let toast = toast.clone();
        wasm_bindgen_futures::spawn_local(async move {
            match crate::share::copy_link(id).await {
                Ok(link) => {
                    log::debug!("copied {link}");
                    toast.set(Some(AttrValue::from("Link copied to clipboard")));
                }
                Err(err) => {
                    log::warn!("copy failed: {err}");
                    toast.set(Some(AttrValue::from("Could not copy the link")));
                }
            }
            let hide_after = i32::try_from(crate::share::TOAST_MS).unwrap_or(i32::MAX);
            if crate::dom::sleep_ms(hide_after).await.is_ok() {
                toast.set(None);
            }
        });
    })
}

fn build_install(state: &AppState) -> Callback<()> {
    let available = state.install_available.clone();
    Callback::from(move |()| {
        let available = available.clone();
        wasm_bindgen_futures::spawn_local(async move {
            match crate::pwa::prompt_install().await {
                Ok(outcome) => log::info!("install prompt answered: {outcome:?}"),
                Err(err) => log::debug!("install unavailable: {err}"),
            }
            available.set(crate::pwa::install_available());
        });
    })
}

fn build_dismiss_toast(state: &AppState) -> Callback<()> {
    let toast = state.toast.clone();
    Callback::from(move |()| toast.set(None))
}
