//! `log` facade backed by the browser console.

use log::{Level, LevelFilter, Log, Metadata, Record};

struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

/// Prefix added to every console line.
pub const LOG_TARGET_PREFIX: &str = "[whatif]";

/// Format a record the way it appears in the console.
#[must_use]
pub fn format_line(level: Level, target: &str, message: &str) -> String {
    format!("{LOG_TARGET_PREFIX} {level} {target}: {message}")
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_line(record.level(), record.target(), &record.args().to_string());
        #[cfg(target_arch = "wasm32")]
        {
            let value = wasm_bindgen::JsValue::from(line);
            match record.level() {
                Level::Error => web_sys::console::error_1(&value),
                Level::Warn => web_sys::console::warn_1(&value),
                Level::Info => web_sys::console::info_1(&value),
                Level::Debug | Level::Trace => web_sys::console::debug_1(&value),
            }
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = line;
        }
    }

    fn flush(&self) {}
}

/// Install the console logger; later calls are no-ops.
pub fn init() {
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_carries_level_and_target() {
        let line = format_line(Level::Warn, "whatif_core::catalog", "using bundled scenarios");
        assert_eq!(
            line,
            "[whatif] WARN whatif_core::catalog: using bundled scenarios"
        );
    }

    #[test]
    fn init_twice_is_harmless() {
        init();
        init();
        log::info!("logger installed");
        assert!(log::max_level() >= LevelFilter::Info);
    }
}
