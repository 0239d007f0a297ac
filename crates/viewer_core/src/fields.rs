use std::path::{Path, PathBuf};

use crate::{Diagnostic, ReactiveStore};

/// Path of the document being viewed.
pub const DOCX_PATH: &str = "docx_path";
/// Path of the optional styles file passed to the converter.
pub const STYLES_PATH: &str = "styles_path";
/// HTML fragment produced by the latest successful conversion.
pub const HTML: &str = "html";
/// Diagnostics produced by the latest successful conversion.
pub const MESSAGES: &str = "messages";

pub const VIEWER_FIELDS: [&str; 4] = [DOCX_PATH, STYLES_PATH, HTML, MESSAGES];

/// Value held by a viewer store field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldValue {
    #[default]
    Empty,
    Path(PathBuf),
    Html(String),
    Messages(Vec<Diagnostic>),
}

impl FieldValue {
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            FieldValue::Path(path) => Some(path),
            _ => None,
        }
    }

    pub fn as_html(&self) -> Option<&str> {
        match self {
            FieldValue::Html(html) => Some(html),
            _ => None,
        }
    }

    pub fn as_messages(&self) -> Option<&[Diagnostic]> {
        match self {
            FieldValue::Messages(messages) => Some(messages),
            _ => None,
        }
    }
}

impl From<PathBuf> for FieldValue {
    fn from(path: PathBuf) -> Self {
        FieldValue::Path(path)
    }
}

/// Builds the store backing the viewer window.
pub fn viewer_store() -> ReactiveStore<FieldValue> {
    ReactiveStore::new(VIEWER_FIELDS)
}
