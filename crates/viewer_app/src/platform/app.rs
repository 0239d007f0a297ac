use std::path::{Path, PathBuf};
use std::rc::{Rc, Weak};
use std::sync::{mpsc, Arc};
use std::time::Duration;

use anyhow::Context;
use viewer_core::{
    viewer_store, FieldValue, Msg, ReactiveStore, StoreError, DOCX_PATH, HTML, MESSAGES,
    STYLES_PATH,
};
use viewer_engine::DocumentConverter;
use viewer_logging::{viewer_debug, viewer_error, viewer_info};

use super::coordinator::WatcherCoordinator;
use super::ui::{FileChooser, FileKind, WindowViews};

type Store = ReactiveStore<FieldValue>;

/// The viewer window's state: the store, the watcher it drives and the UI
/// task queue background conversions report through.
///
/// Everything here runs on the UI thread. Dropping the app stops and joins
/// the active watcher.
pub struct ViewerApp {
    store: Rc<Store>,
    coordinator: Rc<WatcherCoordinator>,
    ui_rx: mpsc::Receiver<Msg>,
}

impl ViewerApp {
    pub fn new(
        converter: Arc<dyn DocumentConverter>,
        poll_interval: Duration,
    ) -> Result<Self, StoreError> {
        let store = Rc::new(viewer_store());
        let (ui_tx, ui_rx) = mpsc::channel();
        let coordinator = Rc::new(WatcherCoordinator::new(converter, ui_tx, poll_interval));

        for field in [DOCX_PATH, STYLES_PATH] {
            let weak = Rc::downgrade(&store);
            let coordinator = coordinator.clone();
            store.on_change(field, move |_| {
                let store = upgrade(&weak)?;
                let document = path_field(&store, DOCX_PATH)?;
                let styles = path_field(&store, STYLES_PATH)?;
                coordinator.restart(document.as_deref(), styles.as_deref())?;
                Ok(())
            })?;
        }

        Ok(Self {
            store,
            coordinator,
            ui_rx,
        })
    }

    pub fn store(&self) -> &ReactiveStore<FieldValue> {
        &self.store
    }

    /// Binds the window's widgets to the store's fields.
    pub fn install_views(&self, views: WindowViews) -> Result<(), StoreError> {
        let weak = Rc::downgrade(&self.store);
        let html_view = views.html;
        self.store.on_change(HTML, move |value| {
            let store = upgrade(&weak)?;
            let base_uri = path_field(&store, DOCX_PATH)?
                .as_deref()
                .map(directory_uri)
                .unwrap_or_default();
            let fragment = value.as_html().unwrap_or_default();
            html_view.borrow_mut().set_html_fragment(fragment, &base_uri)
        })?;

        let message_list = views.messages;
        self.store.on_change(MESSAGES, move |value| {
            let messages = value.as_messages().unwrap_or_default();
            message_list.borrow_mut().set_messages(messages);
            Ok(())
        })?;

        let displays = [
            (DOCX_PATH, views.docx_path),
            (STYLES_PATH, views.styles_path),
        ];
        for (field, display) in displays {
            self.store.on_change(field, move |value| {
                let text = value
                    .as_path()
                    .map(|path| path.display().to_string())
                    .unwrap_or_default();
                display.borrow_mut().set_text(&text);
                Ok(())
            })?;
        }
        Ok(())
    }

    /// Selects the document; restarts watching and converts it immediately.
    pub fn select_docx(&self, path: PathBuf) -> Result<(), StoreError> {
        viewer_info!("Selected document {}", path.display());
        self.store.set(DOCX_PATH, FieldValue::Path(path))
    }

    pub fn select_styles(&self, path: Option<PathBuf>) -> Result<(), StoreError> {
        match &path {
            Some(path) => viewer_info!("Selected styles {}", path.display()),
            None => viewer_info!("Cleared styles"),
        }
        let value = path.map(FieldValue::Path).unwrap_or_default();
        self.store.set(STYLES_PATH, value)
    }

    /// Asks `chooser` for a file of `kind` and selects it.
    ///
    /// Returns whether a file was chosen.
    pub fn choose_file(
        &self,
        kind: FileKind,
        chooser: &mut dyn FileChooser,
    ) -> Result<bool, StoreError> {
        let Some(path) = chooser.choose(kind) else {
            viewer_debug!("{} cancelled", kind.title());
            return Ok(false);
        };
        match kind {
            FileKind::Document => self.select_docx(path)?,
            FileKind::Styles => self.select_styles(Some(path))?,
        }
        Ok(true)
    }

    /// Applies every queued message; returns how many were handled.
    pub fn process_pending_messages(&self) -> anyhow::Result<usize> {
        let mut handled = 0;
        while let Ok(msg) = self.ui_rx.try_recv() {
            self.dispatch_msg(msg)?;
            handled += 1;
        }
        Ok(handled)
    }

    /// Waits up to `timeout` for one message and applies it.
    pub fn wait_for_message(&self, timeout: Duration) -> anyhow::Result<bool> {
        match self.ui_rx.recv_timeout(timeout) {
            Ok(msg) => {
                self.dispatch_msg(msg)?;
                Ok(true)
            }
            Err(_) => Ok(false),
        }
    }

    fn dispatch_msg(&self, msg: Msg) -> anyhow::Result<()> {
        match msg {
            Msg::ConversionFinished { document, result } => {
                let current = path_field(&self.store, DOCX_PATH)?;
                if current.as_deref() != Some(document.as_path()) {
                    viewer_debug!("Dropping stale conversion of {}", document.display());
                    return Ok(());
                }
                self.store
                    .set(HTML, FieldValue::Html(result.html))
                    .context("updating html")?;
                self.store
                    .set(MESSAGES, FieldValue::Messages(result.messages))
                    .context("updating messages")?;
            }
            Msg::ConversionFailed { document, error } => {
                viewer_error!("Could not convert {}: {error}", document.display());
            }
        }
        Ok(())
    }

    pub fn is_watching(&self) -> bool {
        self.coordinator.is_watching()
    }

    pub fn watched_paths(&self) -> Vec<PathBuf> {
        self.coordinator.watched_paths()
    }

    /// Stops and joins the active watcher.
    pub fn shutdown(&self) -> anyhow::Result<()> {
        self.coordinator.stop()?;
        Ok(())
    }
}

impl Drop for ViewerApp {
    fn drop(&mut self) {
        if let Err(err) = self.coordinator.stop() {
            viewer_error!("Failed to stop watcher: {err}");
        }
    }
}

fn upgrade(weak: &Weak<Store>) -> anyhow::Result<Rc<Store>> {
    weak.upgrade().context("viewer store dropped")
}

fn path_field(store: &Store, field: &str) -> Result<Option<PathBuf>, StoreError> {
    Ok(store.get(field)?.as_path().map(Path::to_path_buf))
}

/// `file://` URI of the directory holding `document`, with a trailing slash
/// so relative links resolve inside it.
fn directory_uri(document: &Path) -> String {
    let dir = match document.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let dir = std::path::absolute(dir).unwrap_or_else(|_| dir.to_path_buf());
    let dir = dir.display().to_string().replace('\\', "/");
    if dir.starts_with('/') {
        format!("file://{dir}/")
    } else {
        format!("file:///{dir}/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_uri_points_at_parent_dir() {
        assert_eq!(
            directory_uri(Path::new("/docs/report.docx")),
            "file:///docs/"
        );
    }
}
