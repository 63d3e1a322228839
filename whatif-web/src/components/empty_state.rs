use crate::platform::{CategoryFilter, filter_label};
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    #[prop_or_default]
    pub loading: bool,
    pub filter: CategoryFilter,
    pub on_show_all: Callback<CategoryFilter>,
}

#[function_component(EmptyState)]
pub fn empty_state(p: &Props) -> Html {
    if p.loading {
        return html! {
            <div class="empty-state loading" role="status">
                <p>{ "Loading scenarios\u{2026}" }</p>
            </div>
        };
    }
    let onclick = {
        let cb = p.on_show_all.clone();
        Callback::from(move |_| cb.emit(CategoryFilter::All))
    };
    let message = match &p.filter {
        CategoryFilter::All => "No scenarios are available.".to_string(),
        CategoryFilter::Tag(tag) => format!("No scenarios in {}.", filter_label(tag)),
    };
    html! {
        <div class="empty-state" role="status">
            <h3>{ "Nothing here yet" }</h3>
            <p>{ message }</p>
            if !p.filter.is_all() {
                <button class="nav-btn-secondary" {onclick}>{ "Show all scenarios" }</button>
            }
        </div>
    }
}
