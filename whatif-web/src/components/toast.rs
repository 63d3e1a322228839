use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub message: Option<AttrValue>,
    pub on_dismiss: Callback<()>,
}

#[function_component(Toast)]
pub fn toast(p: &Props) -> Html {
    let onclick = {
        let cb = p.on_dismiss.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let class = classes!("toast", p.message.is_some().then_some("show"));
    html! {
        <div id="toast" {class} role="status" aria-live="polite" {onclick}>
            { p.message.clone().unwrap_or_default() }
        </div>
    }
}
