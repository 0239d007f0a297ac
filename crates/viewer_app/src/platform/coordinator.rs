use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Arc};
use std::time::Duration;

use viewer_core::Msg;
use viewer_engine::{DocumentConverter, PollingWatcher, WatchError};
use viewer_logging::{viewer_error, viewer_info};

use super::conversion::{conversion_callback, ConversionInputs};

/// Owns the single active watcher and replaces it whenever the watched
/// inputs change.
///
/// Lives on the UI thread. The previous watcher is always stopped and joined
/// before its replacement is built, so at most one poll thread exists.
pub struct WatcherCoordinator {
    converter: Arc<dyn DocumentConverter>,
    ui_tx: mpsc::Sender<Msg>,
    poll_interval: Duration,
    active: RefCell<Option<PollingWatcher>>,
}

impl WatcherCoordinator {
    pub fn new(
        converter: Arc<dyn DocumentConverter>,
        ui_tx: mpsc::Sender<Msg>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            converter,
            ui_tx,
            poll_interval,
            active: RefCell::new(None),
        }
    }

    /// Stops the current watcher, then watches `document` (and `styles`).
    ///
    /// One conversion runs synchronously before polling starts. Without a
    /// document nothing is watched.
    pub fn restart(
        &self,
        document: Option<&Path>,
        styles: Option<&Path>,
    ) -> Result<(), WatchError> {
        self.stop()?;

        let Some(document) = document else {
            viewer_info!("No document selected; watcher idle");
            return Ok(());
        };
        let inputs = ConversionInputs {
            document: document.to_path_buf(),
            styles: styles.map(Path::to_path_buf),
        };

        let callback =
            conversion_callback(inputs.clone(), self.converter.clone(), self.ui_tx.clone());
        let mut watcher = PollingWatcher::new(inputs.watched_paths(), callback)?
            .with_poll_interval(self.poll_interval);
        watcher.trigger();
        watcher.start()?;

        *self.active.borrow_mut() = Some(watcher);
        Ok(())
    }

    /// Stops and joins the active watcher, if any.
    ///
    /// A poll thread that died from a panicking callback is already gone, so
    /// it is logged rather than reported.
    pub fn stop(&self) -> Result<(), WatchError> {
        let previous = self.active.borrow_mut().take();
        if let Some(mut watcher) = previous {
            watcher.stop();
            match watcher.join() {
                Ok(()) => {}
                Err(WatchError::Panicked) => {
                    viewer_error!("Watcher for {:?} had panicked", watcher.paths());
                }
                Err(err) => return Err(err),
            }
        }
        Ok(())
    }

    pub fn is_watching(&self) -> bool {
        self.active.borrow().is_some()
    }

    pub fn watched_paths(&self) -> Vec<PathBuf> {
        self.active
            .borrow()
            .as_ref()
            .map(|watcher| watcher.paths().to_vec())
            .unwrap_or_default()
    }
}
