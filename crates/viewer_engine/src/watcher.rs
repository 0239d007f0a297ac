use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, SystemTime};

use thiserror::Error;
use viewer_logging::{viewer_debug, viewer_error, viewer_info, viewer_trace, viewer_warn};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Callback run by the watcher, on the poll thread or from `trigger`.
pub type WatchCallback = Arc<dyn Fn() + Send + Sync>;

#[derive(Debug, Error)]
pub enum WatchError {
    #[error("file not found: {}", path.display())]
    FileNotFound { path: PathBuf },
    #[error("cannot read modification time of {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("watcher is already running")]
    AlreadyRunning,
    #[error("watcher was never started")]
    NotStarted,
    #[error("failed to spawn watcher thread: {0}")]
    Spawn(#[source] io::Error),
    #[error("watcher thread panicked")]
    Panicked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatcherState {
    Created,
    Running,
    Stopping,
    Stopped,
}

/// Last-observed modification time of every watched path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModificationSnapshot {
    times: BTreeMap<PathBuf, SystemTime>,
    missing: BTreeSet<PathBuf>,
}

impl ModificationSnapshot {
    /// Reads the current modification time of each path.
    ///
    /// Fails with `FileNotFound` if any path does not exist.
    pub fn capture(paths: &[PathBuf]) -> Result<Self, WatchError> {
        let mut times = BTreeMap::new();
        for path in paths {
            times.insert(path.clone(), read_mtime(path)?);
        }
        Ok(Self {
            times,
            missing: BTreeSet::new(),
        })
    }

    pub fn modified(&self, path: &Path) -> Option<SystemTime> {
        self.times.get(path).copied()
    }

    /// Re-reads every timestamp and returns whether any of them changed.
    ///
    /// A path whose timestamp cannot be read counts as unchanged and keeps its
    /// previous value until it becomes readable again.
    pub fn refresh(&mut self) -> bool {
        let mut current = self.times.clone();
        for (path, time) in current.iter_mut() {
            match read_mtime(path) {
                Ok(modified) => {
                    if self.missing.remove(path) {
                        viewer_info!("Watched file is readable again: {}", path.display());
                    }
                    *time = modified;
                }
                Err(err) => {
                    if self.missing.insert(path.clone()) {
                        viewer_warn!("Ignoring unreadable watched file: {err}");
                    }
                }
            }
        }

        if current == self.times {
            return false;
        }
        self.times = current;
        true
    }
}

fn read_mtime(path: &Path) -> Result<SystemTime, WatchError> {
    let to_error = |source: io::Error| {
        if source.kind() == io::ErrorKind::NotFound {
            WatchError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            WatchError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    };
    fs::metadata(path)
        .and_then(|meta| meta.modified())
        .map_err(to_error)
}

/// Polls a fixed set of files and runs a callback whenever any of their
/// modification times change.
///
/// A watcher is single use: once stopped it cannot be restarted. Dropping a
/// running watcher stops it and joins its thread.
pub struct PollingWatcher {
    paths: Vec<PathBuf>,
    callback: WatchCallback,
    poll_interval: Duration,
    snapshot: Option<ModificationSnapshot>,
    shutdown: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
    started: bool,
}

impl PollingWatcher {
    pub fn new<F>(paths: Vec<PathBuf>, callback: F) -> Result<Self, WatchError>
    where
        F: Fn() + Send + Sync + 'static,
    {
        let snapshot = ModificationSnapshot::capture(&paths)?;
        Ok(Self {
            paths,
            callback: Arc::new(callback),
            poll_interval: DEFAULT_POLL_INTERVAL,
            snapshot: Some(snapshot),
            shutdown: Arc::new(AtomicBool::new(false)),
            thread: None,
            started: false,
        })
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn state(&self) -> WatcherState {
        match (&self.thread, self.started) {
            (None, false) => WatcherState::Created,
            (None, true) => WatcherState::Stopped,
            (Some(handle), true)
                if self.shutdown.load(Ordering::SeqCst) || handle.is_finished() =>
            {
                WatcherState::Stopping
            }
            (Some(_), _) => WatcherState::Running,
        }
    }

    /// Runs the callback once on the calling thread.
    pub fn trigger(&self) {
        viewer_debug!("Triggering conversion for {:?}", self.paths);
        (self.callback)();
    }

    pub fn start(&mut self) -> Result<(), WatchError> {
        if self.started {
            return Err(WatchError::AlreadyRunning);
        }
        let Some(mut snapshot) = self.snapshot.take() else {
            return Err(WatchError::AlreadyRunning);
        };

        let callback = self.callback.clone();
        let shutdown = self.shutdown.clone();
        let interval = self.poll_interval;
        let handle = thread::Builder::new()
            .name(viewer_logging::WATCHER_THREAD_NAME.to_string())
            .spawn(move || {
                while !shutdown.load(Ordering::SeqCst) {
                    if snapshot.refresh() {
                        viewer_debug!("Change detected in watched files");
                        callback();
                    } else {
                        viewer_trace!("No change in watched files");
                    }
                    thread::sleep(interval);
                }
            })
            .map_err(WatchError::Spawn)?;

        self.thread = Some(handle);
        self.started = true;
        viewer_info!(
            "Watching {} file(s) every {:?}",
            self.paths.len(),
            self.poll_interval
        );
        Ok(())
    }

    /// Asks the poll loop to exit after its current sleep.
    pub fn stop(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }

    /// Blocks until the poll loop has exited.
    pub fn join(&mut self) -> Result<(), WatchError> {
        let handle = match self.thread.take() {
            Some(handle) => handle,
            None if self.started => return Ok(()),
            None => return Err(WatchError::NotStarted),
        };
        if handle.join().is_err() {
            viewer_error!("Watcher thread for {:?} panicked", self.paths);
            return Err(WatchError::Panicked);
        }
        viewer_info!("Stopped watching {:?}", self.paths);
        Ok(())
    }
}

impl Drop for PollingWatcher {
    fn drop(&mut self) {
        if self.thread.is_some() {
            self.stop();
            if let Err(err) = self.join() {
                viewer_error!("Failed to join watcher on drop: {err}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    fn touch(path: &Path, secs: u64) {
        let file = File::options().write(true).open(path).unwrap();
        file.set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(secs))
            .unwrap();
    }

    #[test]
    fn refresh_reports_no_change_when_timestamps_stay_put() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a.txt");
        let b = temp.path().join("b.txt");
        fs::write(&a, "a").unwrap();
        fs::write(&b, "b").unwrap();
        touch(&a, 1_000);
        touch(&b, 2_000);

        let mut snapshot = ModificationSnapshot::capture(&[a.clone(), b.clone()]).unwrap();
        assert!(!snapshot.refresh());
        assert!(!snapshot.refresh());
    }

    #[test]
    fn refresh_updates_every_entry_after_a_change() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a.txt");
        let b = temp.path().join("b.txt");
        fs::write(&a, "a").unwrap();
        fs::write(&b, "b").unwrap();
        touch(&a, 1_000);
        touch(&b, 2_000);

        let mut snapshot = ModificationSnapshot::capture(&[a.clone(), b.clone()]).unwrap();
        touch(&b, 3_000);

        assert!(snapshot.refresh());
        assert_eq!(
            snapshot.modified(&a),
            Some(SystemTime::UNIX_EPOCH + Duration::from_secs(1_000))
        );
        assert_eq!(
            snapshot.modified(&b),
            Some(SystemTime::UNIX_EPOCH + Duration::from_secs(3_000))
        );
        assert!(!snapshot.refresh());
    }

    #[test]
    fn deleted_file_counts_as_unchanged_until_it_returns() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a.txt");
        fs::write(&a, "a").unwrap();
        touch(&a, 1_000);

        let mut snapshot = ModificationSnapshot::capture(std::slice::from_ref(&a)).unwrap();
        fs::remove_file(&a).unwrap();
        assert!(!snapshot.refresh());
        assert_eq!(
            snapshot.modified(&a),
            Some(SystemTime::UNIX_EPOCH + Duration::from_secs(1_000))
        );

        fs::write(&a, "again").unwrap();
        touch(&a, 5_000);
        assert!(snapshot.refresh());
    }

    #[test]
    fn capture_fails_for_missing_path() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing.docx");
        let err = ModificationSnapshot::capture(std::slice::from_ref(&missing)).unwrap_err();
        assert!(matches!(err, WatchError::FileNotFound { path } if path == missing));
    }
}
