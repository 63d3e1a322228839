use crate::platform::{CategoryFilter, category::ALL_TAG, filter_label};
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    /// Distinct tags of the loaded collection, in first-seen order.
    pub categories: Vec<String>,
    pub active: CategoryFilter,
    pub on_select: Callback<CategoryFilter>,
}

#[function_component(CategoryBar)]
pub fn category_bar(p: &Props) -> Html {
    let pill = |filter: CategoryFilter, label: &str| {
        let is_active = filter == p.active;
        let value = filter.as_str().to_string();
        let onclick = {
            let cb = p.on_select.clone();
            Callback::from(move |_| cb.emit(filter.clone()))
        };
        html! {
            <button
                class={classes!("category-pill", is_active.then_some("active"))}
                data-category={value}
                aria-pressed={is_active.to_string()}
                {onclick}
            >
                { label.to_string() }
            </button>
        }
    };

    html! {
        <nav class="category-bar" aria-label="Categories">
            { pill(CategoryFilter::All, "All") }
            { for p.categories.iter().filter(|tag| tag.as_str() != ALL_TAG).map(|tag| {
                pill(CategoryFilter::Tag(tag.clone()), &*filter_label(tag))
            }) }
        </nav>
    }
}
