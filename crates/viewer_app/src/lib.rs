//! Viewer application: wiring between the store, the file watcher and the UI.
mod cli;
pub mod platform;

pub use cli::Cli;
pub use platform::{
    conversion_callback, convert_inputs, parse_command, run_app, ConfigError, ConversionInputs,
    FileChooser, FileKind, HtmlView, LogDestination, MessageListView, PathDisplay, TerminalCommand,
    ViewerApp, ViewerConfig, WatcherCoordinator, WindowViews,
};
