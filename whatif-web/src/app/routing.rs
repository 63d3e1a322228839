use crate::platform::route::{self, Route};

/// Decode the fragment the page was opened with (or navigated to).
#[must_use]
pub fn current_route() -> Option<Route> {
    route::decode(&current_fragment())
}

#[must_use]
pub fn current_fragment() -> String {
    web_sys::window()
        .and_then(|win| win.location().hash().ok())
        .unwrap_or_default()
}

/// Rewrite the fragment without adding a browser history entry.
pub fn replace_fragment(fragment: &str) {
    let Some(win) = web_sys::window() else {
        return;
    };
    if current_fragment() == fragment {
        return;
    }
    let result = win.history().and_then(|history| {
        history.replace_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(fragment))
    });
    if let Err(err) = result {
        crate::dom::console_error(&crate::dom::js_error_message(&err));
    }
}

/// Route that a `hashchange` should act on, skipping fragments the app wrote itself.
#[must_use]
pub fn route_to_follow(fragment: &str, current: Option<Route>) -> Option<Route> {
    let requested = route::decode(fragment)?;
    (Some(requested) != current || requested == Route::Daily).then_some(requested)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::ScenarioId;

    #[test]
    fn follows_only_new_routes() {
        let showing = Some(Route::Scenario(ScenarioId(4)));
        assert_eq!(route_to_follow("#id=4", showing), None);
        assert_eq!(
            route_to_follow("#id=5", showing),
            Some(Route::Scenario(ScenarioId(5)))
        );
        assert_eq!(route_to_follow("#daily", showing), Some(Route::Daily));
        assert_eq!(route_to_follow("#nope", showing), None);
        assert_eq!(
            route_to_follow("#id=1", None),
            Some(Route::Scenario(ScenarioId(1)))
        );
    }
}
