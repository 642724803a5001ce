//! # Shared
//! The shared components between the dump producer and the retention sweeper.
//!

#![warn(missing_docs)]

mod config;
mod dump_file;
mod logger;

pub use config::{
    BackupConfig, Config, DEFAULT_CONFIG_FILE, DatabaseConfig, Engine, LoadConfigError, SaveConfigError,
    resolve_directory,
};
pub use dump_file::{DUMP_FILE_EXTENSION, dump_file_name, is_dump_file};
pub use logger::{LogSettings, LoggerError, init_logger};
