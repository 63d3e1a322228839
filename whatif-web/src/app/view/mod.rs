mod handlers;

pub use handlers::AppHandlers;

use crate::app::state::AppState;
use crate::components::category_bar::CategoryBar;
use crate::components::empty_state::EmptyState;
use crate::components::header::Header;
use crate::components::nav_bar::NavBar;
use crate::components::scenario_card::ScenarioCard;
use crate::components::toast::Toast;
use crate::platform::{CategoryFilter, Theme};
use yew::prelude::*;

pub fn render_app(state: &AppState, handlers: &AppHandlers) -> Html {
    let nav = (*state.session).as_ref();
    let theme = nav.map_or(state.config.default_theme, |nav| nav.theme());
    let categories: Vec<String> = nav
        .map(|nav| nav.store().categories().into_iter().map(str::to_string).collect())
        .unwrap_or_default();
    let active = nav.map_or(CategoryFilter::All, |nav| nav.category().clone());
    let position = nav.and_then(|nav| nav.cursor().map(|c| (c + 1, nav.working_set().len())));
    let can_go_back = nav.is_some_and(|nav| nav.can_go_back());

    let main_view = match nav.and_then(|nav| nav.current().map(|s| (s, nav.is_current_daily()))) {
        Some((scenario, is_daily)) => html! {
            <ScenarioCard key={scenario.id.to_string()} scenario={scenario.clone()} {is_daily} />
        },
        None => html! {
            <EmptyState
                loading={!*state.boot_ready}
                filter={active.clone()}
                on_show_all={handlers.category.clone()}
            />
        },
    };

    html! {
        <div class={classes!("app-shell", (theme == Theme::Light).then_some("light-theme"))}>
            <Header
                {theme}
                install_available={*state.install_available}
                offline_data={*state.offline_data}
                on_toggle_theme={handlers.toggle_theme.clone()}
                on_daily={handlers.daily.clone()}
                on_install={handlers.install.clone()}
            />
            <main id="main" role="main">
                <CategoryBar {categories} {active} on_select={handlers.category.clone()} />
                { main_view }
                <NavBar
                    {position}
                    {can_go_back}
                    on_previous={handlers.previous.clone()}
                    on_next={handlers.next.clone()}
                    on_share={handlers.share.clone()}
                    on_history_back={handlers.history_back.clone()}
                    on_history_forward={handlers.history_forward.clone()}
                />
            </main>
            <p id={crate::a11y::STATUS_REGION_ID} class="sr-only" aria-live="polite"></p>
            <Toast message={(*state.toast).clone()} on_dismiss={handlers.dismiss_toast.clone()} />
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::bootstrap::open_session;
    use crate::platform::{AppConfig, FetchedDocument, MemoryStore};
    use futures::executor::block_on;
    use yew::LocalServerRenderer;

    const SHIPPED: &str = include_str!("../../../static/data/scenarios.json");

    #[derive(Properties, PartialEq)]
    struct HarnessProps {
        fragment: AttrValue,
        boot: bool,
    }

    #[function_component(ViewHarness)]
    fn view_harness(props: &HarnessProps) -> Html {
        let boot = props.boot;
        let fragment = props.fragment.clone();
        let state = AppState {
            config: use_state(AppConfig::default_config),
            session: use_state(move || {
                boot.then(|| {
                    open_session(
                        FetchedDocument::ok(SHIPPED.to_string()),
                        MemoryStore::new(),
                        &AppConfig::default_config(),
                        &fragment,
                        1,
                        0,
                    )
                    .controller
                })
            }),
            boot_ready: use_state(move || boot),
            offline_data: use_state(|| false),
            toast: use_state(|| None::<AttrValue>),
            install_available: use_state(|| false),
        };
        let handlers = AppHandlers::new(&state);
        render_app(&state, &handlers)
    }

    #[test]
    fn loading_view_before_boot() {
        let props = HarnessProps {
            fragment: AttrValue::default(),
            boot: false,
        };
        let html = block_on(LocalServerRenderer::<ViewHarness>::with_props(props).render());
        assert!(html.contains("Loading scenarios"));
        assert!(html.contains("dailyScenarioBtn"));
    }

    #[test]
    fn linked_scenario_renders_after_boot() {
        let props = HarnessProps {
            fragment: AttrValue::from("#id=3"),
            boot: true,
        };
        let html = block_on(LocalServerRenderer::<ViewHarness>::with_props(props).render());
        assert!(html.contains("What if bees disappeared?"), "{html}");
        assert!(html.contains("3 / 12"));
        assert!(html.contains("data-category=\"nature\""));
    }
}
