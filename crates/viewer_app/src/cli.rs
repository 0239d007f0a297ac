use std::path::PathBuf;

use clap::Parser;

use crate::platform::LogDestination;

#[derive(Debug, Default, Parser)]
#[command(
    name = "docx-viewer",
    version,
    about = "Watch a document and its styles file and keep an HTML preview up to date"
)]
pub struct Cli {
    /// Document to open on start-up.
    #[arg(long, value_name = "PATH")]
    pub docx: Option<PathBuf>,

    /// Styles file passed to the converter alongside the document.
    #[arg(long, value_name = "PATH")]
    pub styles: Option<PathBuf>,

    /// Where the rendered HTML preview is written.
    #[arg(long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// RON configuration file (defaults to ./viewer.ron when present).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// How often watched files are polled, in milliseconds.
    #[arg(long, value_name = "MS")]
    pub poll_interval_ms: Option<u64>,

    /// Where log output goes.
    #[arg(long, value_enum)]
    pub log: Option<LogDestination>,

    /// Log at debug level.
    #[arg(short, long)]
    pub verbose: bool,
}
