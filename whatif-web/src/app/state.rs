use crate::platform::{AppConfig, NavigationController};
use yew::prelude::*;

#[derive(Clone)]
pub struct AppState {
    pub config: UseStateHandle<AppConfig>,
    pub session: UseStateHandle<Option<NavigationController>>,
    pub boot_ready: UseStateHandle<bool>,
    /// Set when the scenario fetch failed and the bundled collection is shown.
    pub offline_data: UseStateHandle<bool>,
    pub toast: UseStateHandle<Option<AttrValue>>,
    pub install_available: UseStateHandle<bool>,
}

#[hook]
pub fn use_app_state() -> AppState {
    AppState {
        config: use_state(crate::platform::load_app_config),
        session: use_state(|| None::<NavigationController>),
        boot_ready: use_state(|| false),
        offline_data: use_state(|| false),
        toast: use_state(|| None::<AttrValue>),
        install_available: use_state(crate::pwa::install_available),
    }
}

impl AppState {
    #[must_use]
    pub fn has_scenarios(&self) -> bool {
        (*self.session)
            .as_ref()
            .is_some_and(|nav| !nav.store().is_empty())
    }
}
