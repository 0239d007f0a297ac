use std::fs::{self, File};
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::{mpsc, Arc};

use anyhow::Context;
use viewer_core::{ConversionResult, Msg};
use viewer_engine::DocumentConverter;
use viewer_logging::{viewer_debug, viewer_info, viewer_warn};

/// Files a conversion reads, captured once when its watcher is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionInputs {
    pub document: PathBuf,
    pub styles: Option<PathBuf>,
}

impl ConversionInputs {
    /// Every path whose modification should trigger a reconversion.
    pub fn watched_paths(&self) -> Vec<PathBuf> {
        let mut paths = vec![self.document.clone()];
        paths.extend(self.styles.clone());
        paths
    }
}

pub fn convert_inputs(
    inputs: &ConversionInputs,
    converter: &dyn DocumentConverter,
) -> anyhow::Result<ConversionResult> {
    let styles = match &inputs.styles {
        Some(path) => Some(
            fs::read_to_string(path)
                .with_context(|| format!("reading styles {}", path.display()))?,
        ),
        None => None,
    };
    let file = File::open(&inputs.document)
        .with_context(|| format!("opening document {}", inputs.document.display()))?;
    let mut reader = BufReader::new(file);
    let result = converter
        .convert(&mut reader, styles.as_deref())
        .with_context(|| format!("converting {}", inputs.document.display()))?;
    Ok(result)
}

/// Builds the watcher callback: convert `inputs` and post the outcome to the
/// UI task queue. It never touches the store itself.
pub fn conversion_callback(
    inputs: ConversionInputs,
    converter: Arc<dyn DocumentConverter>,
    ui_tx: mpsc::Sender<Msg>,
) -> impl Fn() + Send + Sync + 'static {
    move || {
        let document = inputs.document.clone();
        let msg = match convert_inputs(&inputs, converter.as_ref()) {
            Ok(result) => {
                viewer_info!(
                    "Converted {} ({} bytes of html, {} message(s))",
                    document.display(),
                    result.html.len(),
                    result.messages.len()
                );
                Msg::ConversionFinished { document, result }
            }
            Err(err) => {
                viewer_warn!("Conversion failed: {err:#}");
                Msg::ConversionFailed {
                    document,
                    error: format!("{err:#}"),
                }
            }
        };
        if ui_tx.send(msg).is_err() {
            viewer_debug!("UI queue closed; dropping conversion result");
        }
    }
}
