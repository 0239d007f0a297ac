//! UI capability interfaces and the terminal frontend implementing them.
pub mod terminal;
mod widgets;

pub use terminal::{parse_command, TerminalCommand};
pub use widgets::{FileChooser, FileKind, HtmlView, MessageListView, PathDisplay, WindowViews};
