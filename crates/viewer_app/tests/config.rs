use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use pretty_assertions::assert_eq;
use tempfile::TempDir;
use viewer_app::{Cli, ConfigError, LogDestination, ViewerConfig};

#[test]
fn defaults_poll_once_per_second() {
    let config = ViewerConfig::default();
    assert_eq!(config.poll_interval(), Duration::from_secs(1));
    assert_eq!(config.preview_path, PathBuf::from("preview.html"));
    assert_eq!(config.log, LogDestination::Terminal);
}

#[test]
fn partial_file_keeps_other_defaults() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("viewer.ron");
    fs::write(&path, "(poll_interval_ms: 250, log: both)").unwrap();

    let config = ViewerConfig::load(Some(&path)).unwrap();
    assert_eq!(
        config,
        ViewerConfig {
            poll_interval_ms: 250,
            log: LogDestination::Both,
            ..ViewerConfig::default()
        }
    );
}

#[test]
fn explicit_missing_file_is_an_error() {
    let temp = TempDir::new().unwrap();
    let err = ViewerConfig::load(Some(&temp.path().join("nope.ron"))).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
}

#[test]
fn malformed_file_is_a_parse_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("viewer.ron");
    fs::write(&path, "(poll_interval_ms: \"fast\")").unwrap();

    let err = ViewerConfig::load_from(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn command_line_overrides_file_values() {
    let cli = Cli {
        output: Some(PathBuf::from("out/view.html")),
        poll_interval_ms: Some(50),
        log: Some(LogDestination::File),
        ..Cli::default()
    };

    let config = ViewerConfig::default().with_overrides(&cli).unwrap();
    assert_eq!(config.poll_interval(), Duration::from_millis(50));
    assert_eq!(config.preview_path, PathBuf::from("out/view.html"));
    assert_eq!(config.log, LogDestination::File);
}

#[test]
fn zero_poll_interval_is_rejected() {
    let cli = Cli {
        poll_interval_ms: Some(0),
        ..Cli::default()
    };
    let err = ViewerConfig::default().with_overrides(&cli).unwrap_err();
    assert!(matches!(err, ConfigError::ZeroPollInterval));
}

#[test]
fn fallback_file_is_used_when_no_path_is_given() {
    let temp = TempDir::new().unwrap();
    let fallback = temp.path().join("viewer.ron");
    fs::write(&fallback, "(ui_tick_ms: 20)").unwrap();

    let config = ViewerConfig::load_or_fallback(None, &fallback).unwrap();
    assert_eq!(config.ui_tick(), Duration::from_millis(20));
    assert_eq!(config.poll_interval(), Duration::from_secs(1));
}

#[test]
fn absent_fallback_gives_defaults() {
    let temp = TempDir::new().unwrap();
    let config = ViewerConfig::load_or_fallback(None, &temp.path().join("viewer.ron")).unwrap();
    assert_eq!(config, ViewerConfig::default());
}

#[test]
fn explicit_path_wins_over_fallback() {
    let temp = TempDir::new().unwrap();
    let fallback = temp.path().join("viewer.ron");
    let explicit = temp.path().join("other.ron");
    fs::write(&fallback, "(poll_interval_ms: 10)").unwrap();
    fs::write(&explicit, "(poll_interval_ms: 300)").unwrap();

    let config = ViewerConfig::load_or_fallback(Some(&explicit), &fallback).unwrap();
    assert_eq!(config.poll_interval(), Duration::from_millis(300));
}
