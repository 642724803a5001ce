use std::{
    fs, io,
    path::{Path, PathBuf},
};

use chrono::{Local, NaiveDateTime};
use shared::{Config, dump_file_name};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::{
    Context, DumpScript, TableSnapshot,
    source::{DatabaseSource, Source, SourceConnection, SourceError},
};

/// The outcome of a single dump.
pub type DumpResult = Result<DumpSummary, DumpError>;

/// A successfully written dump.
#[derive(Debug, Clone, PartialEq)]
pub struct DumpSummary {
    /// The dump file.
    pub file_path: PathBuf,

    /// The size of the dump file in bytes.
    pub size_bytes: u64,

    /// The size of the dump file in MiB, rounded to two decimal places.
    pub size_megabytes: f64,

    /// The number of tables in the dump.
    pub table_count: usize,
}

/// Converts bytes to MiB rounded to two decimal places.
pub fn megabytes(bytes: u64) -> f64 {
    #[allow(clippy::as_conversions)]
    let megabytes = bytes as f64 / (1024.0 * 1024.0);

    (megabytes * 100.0).round() / 100.0
}

/// Dumps databases from a source into a backup directory.
#[derive(Debug, Clone)]
pub struct DumpProducer<S> {
    source: S,
    backup_directory: PathBuf,
}

impl DumpProducer<Source> {
    /// Create a producer for the configured database and backup directory.
    pub fn from_config(config: &Config) -> io::Result<Self> {
        Ok(Self::new(
            Source::from_config(config)?,
            config.backup_directory()?,
        ))
    }
}

impl<S: DatabaseSource> DumpProducer<S> {
    /// Create a producer that writes dumps from `source` into `backup_directory`.
    pub fn new(source: S, backup_directory: PathBuf) -> Self {
        Self {
            source,
            backup_directory,
        }
    }

    /// The database source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// The directory dumps are written to.
    pub fn backup_directory(&self) -> &Path {
        &self.backup_directory
    }

    /// Dump a database, naming the file after the current local time.
    pub fn dump(&self, database_name: &str) -> DumpResult {
        self.dump_at(database_name, Local::now().naive_local())
    }

    /// Dump a database, naming the file after `timestamp`.
    pub fn dump_at(&self, database_name: &str, timestamp: NaiveDateTime) -> DumpResult {
        let mut context = Context::new(database_name);

        let result = self.try_dump(&mut context, database_name, timestamp);

        context.current_context = "";
        match &result {
            Ok(summary) => info!(
                "{context}Backup saved: {} ({:.2} MB)",
                summary.file_path.display(),
                summary.size_megabytes
            ),
            Err(error) => error!("{context}Backup failed: {error}"),
        }

        result
    }

    fn try_dump(
        &self,
        context: &mut Context,
        database_name: &str,
        timestamp: NaiveDateTime,
    ) -> DumpResult {
        context.current_context = "Prepare Directory";
        fs::create_dir_all(&self.backup_directory).map_err(|source| DumpError::Io {
            action: "create backup directory",
            path: self.backup_directory.clone(),
            source,
        })?;
        let file_path = self
            .backup_directory
            .join(dump_file_name(database_name, timestamp));

        context.current_context = "Connect";
        info!("{context}Starting backup");
        let mut connection = self.source.connect(database_name)?;

        // The connection is closed whether or not reading succeeded.
        context.current_context = "Read Tables";
        let read = read_tables(context, connection.as_mut(), database_name, timestamp);
        if let Err(error) = connection.close() {
            warn!("{context}Could not close connection: {error}");
        }
        let (script, table_count) = read?;

        context.current_context = "Write File";
        write_once(context, &file_path, script.as_str())?;

        let size_bytes = fs::metadata(&file_path)
            .map_err(|source| DumpError::Io {
                action: "get metadata of",
                path: file_path.clone(),
                source,
            })?
            .len();

        Ok(DumpSummary {
            file_path,
            size_bytes,
            size_megabytes: megabytes(size_bytes),
            table_count,
        })
    }
}

/// Read every table, in listed order, into a script.
fn read_tables(
    context: &Context,
    connection: &mut dyn SourceConnection,
    database_name: &str,
    timestamp: NaiveDateTime,
) -> Result<(DumpScript, usize), SourceError> {
    let tables = connection.list_tables()?;
    debug!("{context}Found {} tables", tables.len());

    let mut script = DumpScript::new(database_name, timestamp);
    for table in &tables {
        let create_statement = connection.create_statement(table)?;
        let rows = connection.rows(table)?;
        debug!("{context}Read {} rows from '{table}'", rows.len());

        script.push_table(&TableSnapshot {
            name: table.clone(),
            create_statement,
            rows,
        });
    }

    Ok((script, tables.len()))
}

/// Write `contents` next to `path` then move it into place, so a failed write leaves no dump.
fn write_once(context: &Context, path: &Path, contents: &str) -> Result<(), DumpError> {
    let partial_path = {
        let mut partial_path = path.as_os_str().to_owned();
        partial_path.push(".partial");
        PathBuf::from(partial_path)
    };

    if let Err(source) = fs::write(&partial_path, contents) {
        let _ = fs::remove_file(&partial_path);
        return Err(DumpError::Io {
            action: "write",
            path: partial_path,
            source,
        });
    }

    // Two dumps of the same database within a second share a file name.
    if path.exists() {
        warn!("{context}Replacing existing dump {}", path.display());
    }

    fs::rename(&partial_path, path).map_err(|source| {
        let _ = fs::remove_file(&partial_path);
        DumpError::Io {
            action: "move dump into",
            path: path.to_path_buf(),
            source,
        }
    })
}

/// The kind of failure, for callers that need more than the message.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DumpErrorKind {
    Connection,
    Query,
    Filesystem,
}

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum DumpError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("Failed to {action} {path:?}:\n{source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DumpError {
    /// The kind of failure.
    pub fn kind(&self) -> DumpErrorKind {
        match self {
            Self::Source(SourceError::Connect { .. }) => DumpErrorKind::Connection,
            Self::Source(_) => DumpErrorKind::Query,
            Self::Io { .. } => DumpErrorKind::Filesystem,
        }
    }
}
