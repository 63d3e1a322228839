//! Copy-link sharing for the current scenario.

use wasm_bindgen_futures::JsFuture;

use crate::platform::{ScenarioId, route};

/// How long the "link copied" toast stays visible.
pub const TOAST_MS: u32 = 2_000;

/// Strip any fragment or query the page URL may carry before re-appending the route.
#[must_use]
pub fn link_for(origin: &str, pathname: &str, id: ScenarioId) -> String {
    let path = pathname.split(['#', '?']).next().unwrap_or_default();
    route::share_url(origin, path, id)
}

/// Absolute link to `id` on the current page.
///
/// # Errors
/// Returns an error when no window or location is available.
pub fn current_link(id: ScenarioId) -> Result<String, String> {
    let window = web_sys::window().ok_or_else(|| "Window unavailable".to_string())?;
    let location = window.location();
    let origin = location
        .origin()
        .map_err(|err| crate::dom::js_error_message(&err))?;
    let pathname = location
        .pathname()
        .map_err(|err| crate::dom::js_error_message(&err))?;
    Ok(link_for(&origin, &pathname, id))
}

/// Write the link to `id` to the clipboard.
///
/// # Errors
/// Returns an error if the link cannot be built or the clipboard write is rejected.
#[allow(clippy::future_not_send)]
pub async fn copy_link(id: ScenarioId) -> Result<String, String> {
    let link = current_link(id)?;
    let window = web_sys::window().ok_or_else(|| "Window unavailable".to_string())?;
    let clipboard = window.navigator().clipboard();
    JsFuture::from(clipboard.write_text(&link))
        .await
        .map_err(|err| crate::dom::js_error_message(&err))?;
    Ok(link)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_drops_existing_fragment_and_query() {
        assert_eq!(
            link_for("https://example.org", "/whatif/", ScenarioId(3)),
            "https://example.org/whatif/#id=3"
        );
        assert_eq!(
            link_for("https://example.org", "/index.html?utm=x", ScenarioId(8)),
            "https://example.org/index.html#id=8"
        );
    }
}
