#[cfg(target_arch = "wasm32")]
#[path = "wasm/app_tests.rs"]
mod app_tests;
