//! URL fragment codec for deep links.
//!
//! Two fragment shapes are understood: `#id=<n>` addresses a scenario and
//! `#daily` asks for today's pick. Anything else is "no route requested".

use once_cell::sync::Lazy;
use regex::Regex;

use crate::catalog::ScenarioId;

/// Fragment of the daily route.
pub const DAILY_FRAGMENT: &str = "#daily";

static ID_FRAGMENT: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^#id=(\d{1,10})$").ok());

/// Navigation target requested through the URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Scenario(ScenarioId),
    Daily,
}

impl Route {
    #[must_use]
    pub fn fragment(self) -> String {
        match self {
            Self::Scenario(id) => encode(id),
            Self::Daily => DAILY_FRAGMENT.to_string(),
        }
    }
}

/// Fragment addressing a single scenario.
#[must_use]
pub fn encode(id: ScenarioId) -> String {
    format!("#id={id}")
}

/// Parse a location fragment; malformed input is simply `None`.
#[must_use]
pub fn decode(fragment: &str) -> Option<Route> {
    if fragment == DAILY_FRAGMENT {
        return Some(Route::Daily);
    }
    let captures = ID_FRAGMENT.as_ref()?.captures(fragment)?;
    let id = captures.get(1)?.as_str().parse::<u32>().ok()?;
    Some(Route::Scenario(ScenarioId(id)))
}

/// Absolute link to a scenario for the share button.
#[must_use]
pub fn share_url(origin: &str, path: &str, id: ScenarioId) -> String {
    format!("{origin}{path}{}", encode(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_fragments_roundtrip() {
        for raw in ["#id=0", "#id=7", "#id=4294967295"] {
            let Some(Route::Scenario(id)) = decode(raw) else {
                panic!("{raw} should decode");
            };
            assert_eq!(encode(id), raw);
        }
    }

    #[test]
    fn daily_fragment_is_its_own_route() {
        assert_eq!(decode("#daily"), Some(Route::Daily));
        assert_eq!(Route::Daily.fragment(), "#daily");
        assert_eq!(Route::Scenario(ScenarioId(3)).fragment(), "#id=3");
    }

    #[test]
    fn garbage_is_not_a_route() {
        for raw in [
            "", "#", "#bogus", "#id=", "#id=abc", "#id=-3", "#id=5abc", "id=5", "#id=99999999999",
            "#id=4294967296", "#daily2", "#id=7 ", " #id=7", " #daily",
        ] {
            assert_eq!(decode(raw), None, "{raw:?} should not decode");
        }
    }

    #[test]
    fn share_url_appends_fragment() {
        assert_eq!(
            share_url("https://example.org", "/whatif/", ScenarioId(12)),
            "https://example.org/whatif/#id=12"
        );
    }
}
