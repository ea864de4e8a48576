//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Logging backends
//! - Input mapping

pub mod input;

pub use input::{HeldKeys, InputSource, MenuCommand, menu_command};

/// Install the log backend for this target (idempotent)
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).try_init();
}

/// Install the log backend for this target (idempotent)
#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

/// Wall-clock time in Unix milliseconds, 0 if unavailable
#[cfg(not(target_arch = "wasm32"))]
pub fn unix_millis() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as f64)
        .unwrap_or(0.0)
}

/// Wall-clock time in Unix milliseconds, 0 if unavailable
#[cfg(target_arch = "wasm32")]
pub fn unix_millis() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.time_origin() + p.now())
        .unwrap_or(0.0)
}
