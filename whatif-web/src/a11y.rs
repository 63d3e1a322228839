// Accessibility helpers

use crate::platform::NavigationController;

/// Id of the polite live region rendered by the app shell.
pub const STATUS_REGION_ID: &str = "scenario-status";

/// Announcement for the scenario now on screen, e.g. `Scenario 3 of 12: What if...`.
#[must_use]
pub fn status_line(nav: &NavigationController) -> Option<String> {
    let record = nav.current()?;
    let position = nav.cursor()? + 1;
    let daily = if nav.is_current_daily() {
        " (scenario of the day)"
    } else {
        ""
    };
    Some(format!(
        "Scenario {position} of {}{daily}: {}",
        nav.working_set().len(),
        record.title
    ))
}

/// Update the live region status for screen readers
pub fn set_status(msg: &str) {
    if let Some(node) = web_sys::window()
        .and_then(|win| win.document())
        .and_then(|doc| doc.get_element_by_id(STATUS_REGION_ID))
    {
        node.set_text_content(Some(msg));
    }
}
