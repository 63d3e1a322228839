use crate::platform::ScenarioRecord;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub scenario: ScenarioRecord,
    #[prop_or_default]
    pub is_daily: bool,
}

fn render_list(items: &[String]) -> Html {
    html! {
        <ul class="feature-list">
            { for items.iter().map(|item| html! { <li>{ item.clone() }</li> }) }
        </ul>
    }
}

/// One scenario: meta row, comparison columns and the collapsible consequences.
#[function_component(ScenarioCard)]
pub fn scenario_card(p: &Props) -> Html {
    let expanded = use_state(|| false);
    let toggle = {
        let expanded = expanded.clone();
        Callback::from(move |_| expanded.set(!*expanded))
    };
    let s = &p.scenario;
    let minutes = s.reading_minutes();
    let content_class = classes!("deep-dive-content", (*expanded).then_some("visible"));

    html! {
        <article id="scenarioCard" class="scenario-card" data-scenario-id={s.id.to_string()}>
            <div class="scenario-meta">
                <span id="scenarioCategory" class="meta-category">{ s.category_label() }</span>
                <span id="readingTime" class="meta-time">{ format!("{minutes} min read") }</span>
            </div>
            <div class="scenario-content fade-in">
                if p.is_daily {
                    <div class="daily-badge">{ "\u{2605} Scenario of the day" }</div>
                }
                <h2 class="scenario-title">{ s.title.clone() }</h2>
                <p class="scenario-intro">{ s.intro.clone() }</p>
                <div class="comparison-grid">
                    <section class="comparison-column col-changed">
                        <h3>{ "+ Appeared" }</h3>
                        { render_list(&s.changed) }
                    </section>
                    <section class="comparison-column col-disappeared">
                        <h3>{ "\u{2212} Disappeared" }</h3>
                        { render_list(&s.disappeared) }
                    </section>
                </div>
                <div class="deep-dive">
                    <button
                        class="deep-dive-toggle"
                        aria-expanded={(*expanded).to_string()}
                        aria-controls="deep-dive-content"
                        onclick={toggle}
                    >
                        { "Consequences and conclusion" }
                    </button>
                    <div id="deep-dive-content" class={content_class}>
                        <div class="consequence-block">
                            <h4>{ "Internet" }</h4>
                            <p>{ s.consequences.internet.clone() }</p>
                        </div>
                        <div class="consequence-block">
                            <h4>{ "People" }</h4>
                            <p>{ s.consequences.people.clone() }</p>
                        </div>
                        <div class="consequence-block">
                            <h4>{ "Technology" }</h4>
                            <p>{ s.consequences.technology.clone() }</p>
                        </div>
                        <div class="consequence-block conclusion">
                            <h4>{ "Conclusion" }</h4>
                            <p><i>{ s.conclusion.clone() }</i></p>
                        </div>
                    </div>
                </div>
            </div>
        </article>
    }
}
