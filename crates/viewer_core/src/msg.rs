use std::path::PathBuf;

use crate::ConversionResult;

/// Work posted to the UI thread's task queue.
///
/// Background threads never touch the store; they send one of these and the
/// UI loop applies it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// A conversion of `document` completed.
    ConversionFinished {
        document: PathBuf,
        result: ConversionResult,
    },
    /// A conversion of `document` failed; the store keeps its previous output.
    ConversionFailed { document: PathBuf, error: String },
}
