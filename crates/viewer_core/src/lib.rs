//! Viewer core: the reactive view-model store and the values flowing through it.
mod diagnostic;
mod fields;
mod msg;
mod store;

pub use diagnostic::{ConversionResult, Diagnostic, Severity};
pub use fields::{viewer_store, FieldValue, DOCX_PATH, HTML, MESSAGES, STYLES_PATH, VIEWER_FIELDS};
pub use msg::Msg;
pub use store::{Listener, ReactiveStore, StoreError};
