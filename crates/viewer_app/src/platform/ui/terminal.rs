//! Terminal frontend: the preview is written to an HTML file that any browser
//! can display, messages and paths go to the log, and files are chosen by
//! typing their path.

use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use viewer_core::Diagnostic;
use viewer_engine::{wrap_html_document, AtomicFileWriter};
use viewer_logging::{viewer_debug, viewer_info};

use super::{FileChooser, FileKind, HtmlView, MessageListView, PathDisplay};

pub const HELP: &str = "\
Commands:
  docx [PATH]     select the document (prompts when PATH is omitted)
  styles [PATH]   select the styles file (prompts when PATH is omitted)
  clear-styles    stop using a styles file
  help            show this help
  quit            close the viewer";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalCommand {
    Select {
        kind: FileKind,
        path: Option<PathBuf>,
    },
    ClearStyles,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

pub fn parse_command(line: &str) -> TerminalCommand {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };
    let path = (!rest.is_empty()).then(|| PathBuf::from(rest));
    match verb {
        "" => TerminalCommand::Empty,
        "docx" | "open" => TerminalCommand::Select {
            kind: FileKind::Document,
            path,
        },
        "styles" => TerminalCommand::Select {
            kind: FileKind::Styles,
            path,
        },
        "clear-styles" => TerminalCommand::ClearStyles,
        "help" | "?" => TerminalCommand::Help,
        "quit" | "exit" | "q" => TerminalCommand::Quit,
        _ => TerminalCommand::Unknown(line.to_string()),
    }
}

/// Forwards stdin lines to the returned receiver from a detached thread.
///
/// The channel disconnects when stdin reaches end of file.
pub fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
        viewer_debug!("stdin closed");
    });
    rx
}

/// Writes each rendered document atomically to a preview file.
pub struct PreviewFileView {
    writer: AtomicFileWriter,
    renders: usize,
}

impl PreviewFileView {
    pub fn new(target: PathBuf) -> Self {
        Self {
            writer: AtomicFileWriter::new(target),
            renders: 0,
        }
    }

    pub fn renders(&self) -> usize {
        self.renders
    }
}

impl HtmlView for PreviewFileView {
    fn set_html_fragment(&mut self, fragment: &str, base_uri: &str) -> anyhow::Result<()> {
        let document = wrap_html_document(fragment, base_uri);
        let path = self.writer.write(&document)?;
        self.renders += 1;
        viewer_info!("Preview updated: {}", path.display());
        Ok(())
    }
}

/// Keeps the current rows and logs them on every replacement.
#[derive(Debug, Default)]
pub struct LogMessageList {
    rows: Vec<(String, String)>,
}

impl LogMessageList {
    pub fn rows(&self) -> &[(String, String)] {
        &self.rows
    }
}

impl MessageListView for LogMessageList {
    fn set_messages(&mut self, messages: &[Diagnostic]) {
        self.rows = messages
            .iter()
            .map(|m| (m.severity.label().to_string(), m.message.clone()))
            .collect();
        if self.rows.is_empty() {
            viewer_info!("Messages: none");
        }
        for (severity, message) in &self.rows {
            viewer_info!("Message [{severity}] {message}");
        }
    }
}

#[derive(Debug)]
pub struct LogPathDisplay {
    label: &'static str,
    text: String,
}

impl LogPathDisplay {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            text: String::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl PathDisplay for LogPathDisplay {
    fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        viewer_info!("{}: {}", self.label, text);
    }
}

/// Prompts on stdout and waits for the next input line as the chosen path.
pub struct LineFileChooser<'a> {
    lines: &'a mpsc::Receiver<String>,
}

impl<'a> LineFileChooser<'a> {
    pub fn new(lines: &'a mpsc::Receiver<String>) -> Self {
        Self { lines }
    }
}

impl FileChooser for LineFileChooser<'_> {
    fn choose(&mut self, kind: FileKind) -> Option<PathBuf> {
        println!("{} (empty line cancels):", kind.title());
        let line = self.lines.recv().ok()?;
        let line = line.trim();
        (!line.is_empty()).then(|| PathBuf::from(line))
    }
}
