#![deny(missing_docs)]
//! Shared logging utilities for the viewer workspace.
//!
//! This crate provides the `viewer_*` logging macros used across the codebase
//! and a minimal test initializer for the global logger. The macros expand to
//! the `log` facade through a re-export, so callers do not need their own
//! `log` dependency.

#[doc(hidden)]
pub use log as __log;

/// Name given to the background thread that polls watched files.
///
/// Log lines emitted from the poll loop carry this name, which makes the
/// UI-thread/background-thread split visible in the output.
pub const WATCHER_THREAD_NAME: &str = "viewer-watcher";

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! viewer_trace {
    ($($arg:tt)*) => {{
        $crate::__log::trace!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! viewer_info {
    ($($arg:tt)*) => {{
        $crate::__log::info!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! viewer_debug {
    ($($arg:tt)*) => {{
        $crate::__log::debug!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! viewer_warn {
    ($($arg:tt)*) => {{
        $crate::__log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! viewer_error {
    ($($arg:tt)*) => {{
        $crate::__log::error!($($arg)*);
    }};
}

/// Initializes a simple terminal logger for use in tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, ConfigBuilder, TermLogger, TerminalMode};

    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    let config = ConfigBuilder::new()
        .set_thread_level(log::LevelFilter::Error)
        .build();

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        config,
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
