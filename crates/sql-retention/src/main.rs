//! # sql-retention
//! Deletes dump files older than the configured retention window.
//!

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use std::{path::Path, process::ExitCode};

use mimalloc::MiMalloc;
use shared::{Config, DEFAULT_CONFIG_FILE, LogSettings, init_logger};
use sql_retention::RetentionSweeper;
use tracing::{error, info};

fn main() -> ExitCode {
    let verbose = std::env::args().any(|arg| arg.eq("--verbose"));
    let _logger = match init_logger(&LogSettings::new("sql-retention").verbose(verbose)) {
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

    let sweeper = match RetentionSweeper::from_config(&config) {
        Ok(sweeper) => sweeper,
        Err(error) => {
            error!("Could not resolve backup directory: {error}");
            return ExitCode::FAILURE;
        }
    };

    match sweeper.cleanup() {
        Ok(deleted) => {
            info!(
                "Deleted {deleted} backups older than {} days from {}",
                config.backup.keep_backups,
                sweeper.directory().display()
            );
            ExitCode::SUCCESS
        }
        Err(error) => {
            error!("Cleanup failed: {error}");
            ExitCode::FAILURE
        }
    }
}
