use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    /// One-based position and working-set size.
    pub position: Option<(usize, usize)>,
    #[prop_or_default]
    pub can_go_back: bool,
    pub on_previous: Callback<()>,
    pub on_next: Callback<()>,
    pub on_share: Callback<()>,
    pub on_history_back: Callback<()>,
    pub on_history_forward: Callback<()>,
}

fn forward(cb: &Callback<()>) -> Callback<MouseEvent> {
    let cb = cb.clone();
    Callback::from(move |_| cb.emit(()))
}

#[function_component(NavBar)]
pub fn nav_bar(p: &Props) -> Html {
    let disabled = p.position.is_none();
    let counter = p
        .position
        .map(|(at, total)| format!("{at} / {total}"))
        .unwrap_or_default();

    html! {
        <div class="nav-bar" role="navigation" aria-label="Scenario navigation">
            <button id="prevScenarioBtn" class="nav-btn" onclick={forward(&p.on_previous)} {disabled} aria-label="Previous scenario">
                { "\u{2190}" }
            </button>
            <span class="nav-counter" aria-live="polite">{ counter }</span>
            <button id="nextScenarioBtn" class="nav-btn" onclick={forward(&p.on_next)} {disabled} aria-label="Next scenario">
                { "\u{2192}" }
            </button>
            <div class="nav-secondary">
                <button id="historyBackBtn" class="nav-btn-secondary" onclick={forward(&p.on_history_back)} disabled={!p.can_go_back}>
                    { "Back" }
                </button>
                <button id="randomScenarioBtn" class="nav-btn-secondary" onclick={forward(&p.on_history_forward)} {disabled}>
                    { "Random" }
                </button>
                <button id="shareBtn" class="nav-btn-secondary" onclick={forward(&p.on_share)} {disabled}>
                    { "Share" }
                </button>
            </div>
        </div>
    }
}
