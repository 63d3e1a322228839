#![allow(clippy::match_same_arms)]

/// Browsing action bound to a keyboard shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Next,
    Previous,
    Daily,
    HistoryForward,
    HistoryBack,
    ToggleTheme,
}

// Centralized keyboard mapping
// Takes KeyboardEvent.key; modifiers are handled by the caller
#[must_use]
pub fn key_to_action(key: &str) -> Option<KeyAction> {
    match key {
        "ArrowRight" => Some(KeyAction::Next),
        "ArrowLeft" => Some(KeyAction::Previous),
        "d" | "D" => Some(KeyAction::Daily),
        "r" | "R" => Some(KeyAction::HistoryForward),
        "b" | "B" => Some(KeyAction::HistoryBack),
        "t" | "T" => Some(KeyAction::ToggleTheme),
        _ => None,
    }
}

/// Shortcuts are ignored while a modifier is held so browser bindings keep working.
#[must_use]
pub const fn accepts_modifiers(ctrl: bool, alt: bool, meta: bool) -> bool {
    !(ctrl || alt || meta)
}
