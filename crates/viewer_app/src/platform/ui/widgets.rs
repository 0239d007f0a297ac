use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use viewer_core::Diagnostic;

/// Displays converted HTML.
pub trait HtmlView {
    /// Shows `fragment` wrapped in a full document, resolving relative links
    /// against `base_uri`.
    fn set_html_fragment(&mut self, fragment: &str, base_uri: &str) -> anyhow::Result<()>;
}

/// Displays conversion diagnostics; every call replaces all rows.
pub trait MessageListView {
    fn set_messages(&mut self, messages: &[Diagnostic]);
}

/// Read-only display of a selected path.
pub trait PathDisplay {
    fn set_text(&mut self, text: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Document,
    Styles,
}

impl FileKind {
    pub fn title(self) -> &'static str {
        match self {
            FileKind::Document => "Select .docx file",
            FileKind::Styles => "Select styles file",
        }
    }
}

/// Modal open-file picker. Blocks the UI thread until dismissed; `None`
/// means the user cancelled.
pub trait FileChooser {
    fn choose(&mut self, kind: FileKind) -> Option<PathBuf>;
}

/// The widgets the window binds to store fields.
#[derive(Clone)]
pub struct WindowViews {
    pub html: Rc<RefCell<dyn HtmlView>>,
    pub messages: Rc<RefCell<dyn MessageListView>>,
    pub docx_path: Rc<RefCell<dyn PathDisplay>>,
    pub styles_path: Rc<RefCell<dyn PathDisplay>>,
}
