use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use viewer_logging::viewer_info;

use super::LogDestination;
use crate::Cli;

/// Configuration file picked up from the working directory when no
/// `--config` flag is given.
pub const DEFAULT_CONFIG_FILE: &str = "viewer.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("poll interval must be at least 1 ms")]
    ZeroPollInterval,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub poll_interval_ms: u64,
    pub preview_path: PathBuf,
    pub log: LogDestination,
    pub ui_tick_ms: u64,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1_000,
            preview_path: PathBuf::from("preview.html"),
            log: LogDestination::Terminal,
            ui_tick_ms: 75,
        }
    }
}

impl ViewerConfig {
    /// Loads `explicit`, or `viewer.ron` in the working directory when it
    /// exists, or the defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_or_fallback(explicit, Path::new(DEFAULT_CONFIG_FILE))
    }

    /// Loads `explicit`, or `fallback` when it is an existing file, or the
    /// defaults.
    pub fn load_or_fallback(
        explicit: Option<&Path>,
        fallback: &Path,
    ) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load_from(path),
            None if fallback.is_file() => Self::load_from(fallback),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = ron::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        viewer_info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Applies command-line flags on top of the file/default values.
    pub fn with_overrides(mut self, cli: &Cli) -> Result<Self, ConfigError> {
        if let Some(ms) = cli.poll_interval_ms {
            self.poll_interval_ms = ms;
        }
        if let Some(output) = &cli.output {
            self.preview_path = output.clone();
        }
        if let Some(log) = cli.log {
            self.log = log;
        }
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::ZeroPollInterval);
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn ui_tick(&self) -> Duration {
        Duration::from_millis(self.ui_tick_ms.max(1))
    }
}
