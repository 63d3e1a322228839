//! Performs the side effects the navigation controller asks for.

use crate::platform::{NavigationController, PersistedSession, Theme};
use crate::storage::LocalStorageStore;

/// Flush pending effects: persist the snapshot, replace the URL fragment
/// (announcing the new scenario) and restyle the page for the active theme.
pub fn commit(nav: &mut NavigationController, storage_key: &str) {
    let effects = nav.take_effects();
    if effects.persist {
        let session = PersistedSession::with_key(LocalStorageStore, storage_key);
        if let Err(err) = session.save(&nav.snapshot()) {
            log::warn!("session not saved: {err}");
        }
    }
    if let Some(fragment) = effects.replace_route {
        super::routing::replace_fragment(&fragment);
        if let Some(status) = crate::a11y::status_line(nav) {
            crate::a11y::set_status(&status);
        }
    }
    apply_theme(nav.theme());
}

/// Mirror the theme onto `<body>` the way the stylesheet expects.
pub fn apply_theme(theme: Theme) {
    let Some(body) = web_sys::window()
        .and_then(|win| win.document())
        .and_then(|doc| doc.body())
    else {
        return;
    };
    body.set_class_name(theme.body_class());
}

/// Bring the card back into view after moving to another scenario.
pub fn scroll_to_top() {
    if let Some(win) = web_sys::window() {
        win.scroll_to_with_x_and_y(0.0, 0.0);
    }
}
