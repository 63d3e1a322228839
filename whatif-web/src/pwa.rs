//! Install prompt and service worker registration.

use std::cell::RefCell;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use yew::Callback;

thread_local! {
    static DEFERRED_PROMPT: RefCell<Option<JsValue>> = const { RefCell::new(None) };
    static INSTALL_LISTENER: RefCell<Option<Callback<bool>>> = const { RefCell::new(None) };
}

/// User's answer to the native install dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    Accepted,
    Dismissed,
}

impl InstallOutcome {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if raw == "accepted" {
            Self::Accepted
        } else {
            Self::Dismissed
        }
    }
}

fn notify_install_available(available: bool) {
    INSTALL_LISTENER.with(|slot| {
        if let Some(cb) = slot.borrow().as_ref() {
            cb.emit(available);
        }
    });
}

/// Receive install-availability changes (the app shows or hides its button).
pub fn on_install_available(cb: Callback<bool>) {
    let available = install_available();
    INSTALL_LISTENER.with(|slot| *slot.borrow_mut() = Some(cb.clone()));
    if available {
        cb.emit(true);
    }
}

#[must_use]
pub fn install_available() -> bool {
    DEFERRED_PROMPT.with(|slot| slot.borrow().is_some())
}

/// Register `sw.js` when the browser supports service workers.
pub fn register_service_worker() {
    let Some(window) = web_sys::window() else {
        return;
    };
    let navigator = window.navigator();
    if !js_sys::Reflect::has(&navigator, &JsValue::from_str("serviceWorker")).unwrap_or(false) {
        log::info!("service workers unsupported; running online only");
        return;
    }
    let script = crate::paths::asset_path("sw.js");
    let options = web_sys::RegistrationOptions::new();
    options.set_scope(&crate::paths::worker_scope());
    let promise = navigator
        .service_worker()
        .register_with_options(&script, &options);
    wasm_bindgen_futures::spawn_local(async move {
        match JsFuture::from(promise).await {
            Ok(_) => log::info!("service worker registered from {script}"),
            Err(err) => log::warn!(
                "service worker registration failed: {}",
                crate::dom::js_error_message(&err)
            ),
        }
    });
}

/// Hold on to `beforeinstallprompt` so the app can offer its own install button.
pub fn listen_for_install_prompt() {
    let Some(window) = web_sys::window() else {
        return;
    };
    let handler = Closure::<dyn FnMut(web_sys::Event)>::new(|event: web_sys::Event| {
        event.prevent_default();
        DEFERRED_PROMPT.with(|slot| *slot.borrow_mut() = Some(event.into()));
        notify_install_available(true);
    });
    if let Err(err) = window
        .add_event_listener_with_callback("beforeinstallprompt", handler.as_ref().unchecked_ref())
    {
        crate::dom::console_error(&crate::dom::js_error_message(&err));
    }
    handler.forget();
}

/// Show the deferred install dialog; the prompt can be used only once.
///
/// # Errors
/// Returns an error when no prompt is pending or the browser rejects it.
#[allow(clippy::future_not_send)]
pub async fn prompt_install() -> Result<InstallOutcome, String> {
    let event = DEFERRED_PROMPT
        .with(|slot| slot.borrow_mut().take())
        .ok_or_else(|| "no install prompt pending".to_string())?;
    notify_install_available(false);

    let prompt = js_sys::Reflect::get(&event, &JsValue::from_str("prompt"))
        .ok()
        .and_then(|value| value.dyn_into::<js_sys::Function>().ok())
        .ok_or_else(|| "install prompt is not callable".to_string())?;
    prompt
        .call0(&event)
        .map_err(|err| crate::dom::js_error_message(&err))?;

    let choice = js_sys::Reflect::get(&event, &JsValue::from_str("userChoice"))
        .map_err(|err| crate::dom::js_error_message(&err))?;
    let choice = JsFuture::from(js_sys::Promise::resolve(&choice))
        .await
        .map_err(|err| crate::dom::js_error_message(&err))?;
    let outcome = js_sys::Reflect::get(&choice, &JsValue::from_str("outcome"))
        .ok()
        .and_then(|value| value.as_string())
        .unwrap_or_default();
    Ok(InstallOutcome::parse(&outcome))
}
