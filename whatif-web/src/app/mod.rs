#[cfg(target_arch = "wasm32")]
use yew::prelude::*;

pub mod bootstrap;
pub mod effects;
pub mod routing;
pub mod state;
pub mod view;

#[cfg(target_arch = "wasm32")]
#[function_component(App)]
pub fn app() -> Html {
    let app_state = state::use_app_state();
    bootstrap::use_bootstrap(&app_state);

    let handlers = view::AppHandlers::new(&app_state);
    listeners::use_keyboard_shortcuts(&handlers);
    listeners::use_hash_routing(&app_state, &handlers);

    view::render_app(&app_state, &handlers)
}

#[cfg(target_arch = "wasm32")]
mod listeners {
    use super::state::AppState;
    use super::view::AppHandlers;
    use crate::input::{accepts_modifiers, key_to_action};
    use wasm_bindgen::JsCast;
    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::convert::FromWasmAbi;
    use yew::prelude::*;

    fn listen<E: FromWasmAbi + 'static>(
        event: &'static str,
        handler: impl FnMut(E) + 'static,
    ) -> impl FnOnce() {
        let closure = Closure::<dyn FnMut(E)>::new(handler);
        let window = web_sys::window();
        if let Some(win) = &window {
            let _ = win.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        }
        move || {
            if let Some(win) = window {
                let _ = win
                    .remove_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
            }
        }
    }

    /// Keep a window listener bound to this render's callbacks.
    #[hook]
    pub fn use_keyboard_shortcuts(handlers: &AppHandlers) {
        use_effect_with(handlers.clone(), |handlers| {
            let handlers = handlers.clone();
            listen("keydown", move |event: web_sys::KeyboardEvent| {
                if !accepts_modifiers(event.ctrl_key(), event.alt_key(), event.meta_key()) {
                    return;
                }
                if let Some(action) = key_to_action(&event.key()) {
                    event.prevent_default();
                    handlers.for_key(action).emit(());
                }
            })
        });
    }

    /// Follow fragments typed into the address bar after startup.
    #[hook]
    pub fn use_hash_routing(state: &AppState, handlers: &AppHandlers) {
        let current = (*state.session).as_ref().and_then(|nav| nav.route());
        use_effect_with((handlers.route.clone(), current), |(on_route, current)| {
            let on_route = on_route.clone();
            let current = *current;
            listen("hashchange", move |_: web_sys::Event| {
                let fragment = super::routing::current_fragment();
                if let Some(route) = super::routing::route_to_follow(&fragment, current) {
                    on_route.emit(route);
                }
            })
        });
    }
}
