mod app;
mod config;
mod conversion;
mod coordinator;
mod logging;
mod run;
pub mod ui;

pub use app::ViewerApp;
pub use config::{ConfigError, ViewerConfig, DEFAULT_CONFIG_FILE};
pub use conversion::{conversion_callback, convert_inputs, ConversionInputs};
pub use coordinator::WatcherCoordinator;
pub use logging::{initialize as initialize_logging, LogDestination};
pub use run::run_app;
pub use ui::{
    parse_command, FileChooser, FileKind, HtmlView, MessageListView, PathDisplay, TerminalCommand,
    WindowViews,
};
