//! Viewer engine: file watching, conversion and preview output.
mod convert;
mod document;
mod persist;
mod watcher;

pub use convert::{ConvertError, DocumentConverter, PlainTextConverter};
pub use document::wrap_html_document;
pub use persist::{ensure_parent_dir, AtomicFileWriter, PersistError};
pub use watcher::{
    ModificationSnapshot, PollingWatcher, WatchCallback, WatchError, WatcherState,
    DEFAULT_POLL_INTERVAL,
};
