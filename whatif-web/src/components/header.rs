use crate::platform::Theme;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub theme: Theme,
    #[prop_or_default]
    pub install_available: bool,
    #[prop_or_default]
    pub offline_data: bool,
    pub on_toggle_theme: Callback<()>,
    pub on_daily: Callback<()>,
    pub on_install: Callback<()>,
}

#[function_component(Header)]
pub fn header(p: &Props) -> Html {
    let toggle = {
        let cb = p.on_toggle_theme.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let daily = {
        let cb = p.on_daily.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let install = {
        let cb = p.on_install.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let (icon, theme_label) = match p.theme {
        Theme::Dark => ("\u{263E}", "Switch to light theme"),
        Theme::Light => ("\u{2600}", "Switch to dark theme"),
    };

    html! {
        <header role="banner">
            <a href="#main" class="sr-only">{ "Skip to content" }</a>
            <div class="header-content">
                <h1 class="logo">{ "What If?" }</h1>
                <div class="header-right">
                    if p.install_available {
                        <button id="installAppBtn" class="header-btn" onclick={install}>
                            { "Install" }
                        </button>
                    }
                    <button id="dailyScenarioBtn" class="header-btn" onclick={daily}>
                        { "Today's pick" }
                    </button>
                    <button id="themeToggle" class="header-btn" onclick={toggle} aria-label={theme_label}>
                        { icon }
                    </button>
                </div>
            </div>
            if p.offline_data {
                <p class="offline-note" role="status">
                    { "Offline: showing the built-in scenarios." }
                </p>
            }
        </header>
    }
}
