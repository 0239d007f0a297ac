use std::cell::RefCell;
use std::rc::Rc;
use std::sync::{mpsc, Arc};

use log::LevelFilter;
use viewer_engine::PlainTextConverter;
use viewer_logging::{viewer_error, viewer_info, viewer_warn};

use super::ui::terminal::{
    spawn_stdin_reader, LineFileChooser, LogMessageList, LogPathDisplay, PreviewFileView, HELP,
};
use super::ui::{parse_command, FileKind, TerminalCommand, WindowViews};
use super::{initialize_logging, ViewerApp, ViewerConfig};
use crate::Cli;

/// Runs the viewer until `quit` or end of input, then stops the watcher.
pub fn run_app(cli: Cli) -> anyhow::Result<()> {
    let config = ViewerConfig::load(cli.config.as_deref())?.with_overrides(&cli)?;
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    initialize_logging(config.log, level);
    viewer_info!("Starting viewer; preview at {}", config.preview_path.display());

    let app = ViewerApp::new(Arc::new(PlainTextConverter), config.poll_interval())?;
    app.install_views(WindowViews {
        html: Rc::new(RefCell::new(PreviewFileView::new(config.preview_path.clone()))),
        messages: Rc::new(RefCell::new(LogMessageList::default())),
        docx_path: Rc::new(RefCell::new(LogPathDisplay::new("Document"))),
        styles_path: Rc::new(RefCell::new(LogPathDisplay::new("Styles"))),
    })?;

    if let Some(styles) = cli.styles {
        report(app.select_styles(Some(styles)));
    }
    if let Some(docx) = cli.docx {
        report(app.select_docx(docx));
    }

    println!("{HELP}");
    let lines = spawn_stdin_reader();
    loop {
        match lines.recv_timeout(config.ui_tick()) {
            Ok(line) => {
                if !handle_command(&app, &line, &lines) {
                    break;
                }
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
        report(app.process_pending_messages());
    }

    viewer_info!("Closing viewer");
    app.shutdown()
}

/// Returns false when the viewer should close.
fn handle_command(app: &ViewerApp, line: &str, lines: &mpsc::Receiver<String>) -> bool {
    match parse_command(line) {
        TerminalCommand::Select {
            kind,
            path: Some(path),
        } => match kind {
            FileKind::Document => report(app.select_docx(path)),
            FileKind::Styles => report(app.select_styles(Some(path))),
        },
        TerminalCommand::Select { kind, path: None } => {
            let mut chooser = LineFileChooser::new(lines);
            report(app.choose_file(kind, &mut chooser));
        }
        TerminalCommand::ClearStyles => report(app.select_styles(None)),
        TerminalCommand::Help => println!("{HELP}"),
        TerminalCommand::Quit => return false,
        TerminalCommand::Empty => {}
        TerminalCommand::Unknown(line) => viewer_warn!("Unknown command: {line}"),
    }
    true
}

/// There is no error dialog; failures are logged and the window stays open.
fn report<T, E>(result: Result<T, E>)
where
    E: Into<anyhow::Error>,
{
    if let Err(err) = result {
        viewer_error!("{:#}", err.into());
    }
}
