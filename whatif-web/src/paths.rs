//! Helpers for constructing URLs to static assets that respect the deployment base path.
///
/// When `PUBLIC_URL` is set at compile time (e.g., `/whatif` for GitHub Pages),
/// generated URLs are prefixed accordingly. Local builds without `PUBLIC_URL`
/// fall back to root-anchored paths.
#[must_use]
pub fn asset_path(relative: &str) -> String {
    asset_path_with_base(relative, option_env!("PUBLIC_URL").unwrap_or(""))
}

/// Scope the service worker controls (e.g., `/whatif/` under a subdirectory).
#[must_use]
pub fn worker_scope() -> String {
    worker_scope_with_base(option_env!("PUBLIC_URL").unwrap_or(""))
}

fn asset_path_with_base(relative: &str, base: &str) -> String {
    let base = base.trim_end_matches('/');
    let rel = relative.trim_start_matches("./").trim_start_matches('/');

    if base.is_empty() {
        format!("/{rel}")
    } else {
        format!("{base}/{rel}")
    }
}

fn worker_scope_with_base(base: &str) -> String {
    let base = base.trim().trim_end_matches('/');
    format!("{base}/")
}

#[cfg(test)]
mod tests {
    use super::{asset_path, worker_scope};

    #[test]
    fn builds_root_prefixed_path_when_base_missing() {
        assert_eq!(asset_path("scenarios.json"), "/scenarios.json");
        assert_eq!(asset_path("./sw.js"), "/sw.js");
        assert_eq!(asset_path("/styles.css"), "/styles.css");
    }

    #[test]
    fn builds_paths_with_public_base() {
        assert_eq!(
            super::asset_path_with_base("scenarios.json", "/whatif"),
            "/whatif/scenarios.json"
        );
        assert_eq!(
            super::asset_path_with_base("./sw.js", "/whatif/"),
            "/whatif/sw.js"
        );
    }

    #[test]
    fn worker_scope_is_root_by_default() {
        assert_eq!(worker_scope(), "/");
    }

    #[test]
    fn worker_scope_keeps_trailing_slash() {
        assert_eq!(super::worker_scope_with_base("/whatif"), "/whatif/");
        assert_eq!(super::worker_scope_with_base("/whatif/"), "/whatif/");
    }
}
