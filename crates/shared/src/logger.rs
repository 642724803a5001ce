use std::{fs, io, path::PathBuf};

use thiserror::Error;
use tracing::{Level, Subscriber, subscriber::set_global_default};
use tracing_appender::{
    non_blocking::{NonBlocking, WorkerGuard},
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{
    Layer, filter::Targets, layer::SubscriberExt, registry, registry::LookupSpan,
};

/// Where and how much a binary logs.
#[derive(Debug, Clone)]
pub struct LogSettings {
    /// Log files are named `{application}.{date}.log`.
    pub application: String,

    /// The directory log files are written to.
    pub directory: PathBuf,

    /// The most verbose level that is logged.
    pub level: Level,

    /// Older log files past this count are removed on rotation.
    pub max_log_files: usize,
}

impl LogSettings {
    /// Daily logs in `./logs`, at `INFO`, kept for 90 days.
    pub fn new(application: &str) -> Self {
        Self {
            application: application.to_string(),
            directory: PathBuf::from("./logs"),
            level: Level::INFO,
            max_log_files: 90,
        }
    }

    /// Log at `DEBUG` if `verbose`, including every table read and file kept.
    pub fn verbose(mut self, verbose: bool) -> Self {
        if verbose {
            self.level = Level::DEBUG;
        }
        self
    }
}

/// Create and set the global loggers, writing to a rolling file and stdout.
///
/// The returned guards flush pending lines when dropped and must be held until exit.
pub fn init_logger(settings: &LogSettings) -> Result<Vec<WorkerGuard>, LoggerError> {
    fs::create_dir_all(&settings.directory).map_err(LoggerError::CreateDirectory)?;

    let appender = RollingFileAppender::builder()
        .filename_prefix(&settings.application)
        .filename_suffix("log")
        .rotation(Rotation::DAILY)
        .max_log_files(settings.max_log_files)
        .build(&settings.directory)?;

    let (file_writer, file_guard) = tracing_appender::non_blocking(appender);
    let (std_writer, std_guard) = tracing_appender::non_blocking(io::stdout());

    // The MySQL driver is chatty about its connection pool below WARN.
    let filter = Targets::new()
        .with_default(settings.level)
        .with_target("mysql", Level::WARN);

    let registry = registry()
        .with(output_layer(file_writer, false))
        .with(output_layer(std_writer, true))
        .with(filter);

    set_global_default(registry)?;

    Ok(vec![file_guard, std_guard])
}

fn output_layer<S>(writer: NonBlocking, ansi: bool) -> impl Layer<S>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(ansi)
        .with_target(false)
}

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("Failed to create rolling appender:\n{0}")]
    CreateRollingAppender(#[from] tracing_appender::rolling::InitError),

    #[error("Failed to create log directory:\n{0}")]
    CreateDirectory(#[source] io::Error),

    #[error("A global logger is already set:\n{0}")]
    SetGlobal(#[from] tracing::subscriber::SetGlobalDefaultError),
}
