//! Tests for the global logger
//!
//! Only one global logger can be set per process, so this file holds a single test.

use std::fs;

use shared::{LogSettings, LoggerError, init_logger};
use tracing::{Level, debug, info};

#[test]
fn logs_to_a_rolling_file_once() {
    let directory = tempfile::tempdir().unwrap();
    let settings = LogSettings {
        directory: directory.path().join("logs"),
        ..LogSettings::new("sql-dump")
    };
    assert_eq!(settings.level, Level::INFO);
    assert_eq!(LogSettings::new("x").verbose(true).level, Level::DEBUG);

    let guards = init_logger(&settings).unwrap();
    info!("Backup saved");
    debug!("Found 3 tables");

    let error = init_logger(&settings).unwrap_err();
    assert!(matches!(error, LoggerError::SetGlobal(_)));

    // Dropping the guards flushes the file writer.
    drop(guards);

    let files: Vec<_> = fs::read_dir(&settings.directory)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    assert_eq!(files.len(), 1);

    let name = files[0].file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("sql-dump."));
    assert!(name.ends_with(".log"));

    let contents = fs::read_to_string(&files[0]).unwrap();
    assert!(contents.contains("Backup saved"));
    assert!(!contents.contains("Found 3 tables"));
    assert!(!contents.contains("\u{1b}["));
}
