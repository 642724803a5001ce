//! # sql-dump
//! Dumps every configured database into the backup directory.
//!

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use std::{path::Path, process::ExitCode};

use mimalloc::MiMalloc;
use shared::{Config, DEFAULT_CONFIG_FILE, LogSettings, init_logger};
use sql_dump::DumpProducer;
use tracing::{error, info, warn};

fn main() -> ExitCode {
    let verbose = std::env::args().any(|arg| arg.eq("--verbose"));
    let _logger = match init_logger(&LogSettings::new("sql-dump").verbose(verbose)) {
        Ok(guards) => guards,
        Err(error) => {
            eprintln!("Could not initialize logger: {error}");
            return ExitCode::FAILURE;
        }
    };

    // Initialize config if args include 'init'.
    if std::env::args().any(|arg| arg.eq("init")) {
        if let Err(error) = Config::default().save_toml(Path::new(DEFAULT_CONFIG_FILE)) {
            error!("Could not create config file: {error}");
            return ExitCode::FAILURE;
        }
        return ExitCode::SUCCESS;
    }

    // Load config
    let config = match Config::load_default() {
        Ok(config) => config,
        Err(error) => {
            error!("Could not load config: {error}");
            return ExitCode::FAILURE;
        }
    };

    let producer = match DumpProducer::from_config(&config) {
        Ok(producer) => producer,
        Err(error) => {
            error!("Could not resolve directories: {error}");
            return ExitCode::FAILURE;
        }
    };

    if config.backup.databases.is_empty() {
        warn!("No databases configured");
    }

    // Each database is independent, a failure does not stop the rest.
    let failures = config
        .backup
        .databases
        .iter()
        .filter(|database| producer.dump(database).is_err())
        .count();

    info!(
        "Finished: {} succeeded, {failures} failed",
        config.backup.databases.len() - failures
    );

    if failures > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
