#![forbid(unsafe_code)]
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

pub mod a11y;
pub mod app;
pub mod components;
pub mod dom;
pub mod input;
pub mod logging;
pub mod paths;
pub mod platform;
pub mod pwa;
pub mod share;
pub mod storage;
pub mod worker;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    logging::init();
    // The same module is loaded by the service worker, which has no window.
    if web_sys::window().is_none() {
        return;
    }
    pwa::register_service_worker();
    pwa::listen_for_install_prompt();
    yew::Renderer::<app::App>::new().render();
}
