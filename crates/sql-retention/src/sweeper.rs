use core::time::Duration;
use std::{
    fs, io,
    path::{Path, PathBuf},
    time::SystemTime,
};

use shared::{Config, is_dump_file};
use thiserror::Error;
use tracing::{debug, info, warn};

const DAY: Duration = Duration::from_secs(60 * 60 * 24);
const CONTEXT: &str = "[Cleanup] ";

/// Whole days between `modified` and `now`. A modification time in the future is zero days old.
pub fn age_in_days(now: SystemTime, modified: SystemTime) -> u64 {
    now.duration_since(modified)
        .map_or(0, |age| age.as_secs() / DAY.as_secs())
}

/// Deletes dump files older than the retention window.
#[derive(Debug, Clone)]
pub struct RetentionSweeper {
    directory: PathBuf,
    keep_days: u64,
}

impl RetentionSweeper {
    /// Create a sweeper over `directory` that keeps files for `keep_days` whole days.
    pub fn new(directory: PathBuf, keep_days: u64) -> Self {
        Self {
            directory,
            keep_days,
        }
    }

    /// Create a sweeper for the configured backup directory and retention.
    pub fn from_config(config: &Config) -> io::Result<Self> {
        Ok(Self::new(
            config.backup_directory()?,
            config.backup.keep_backups,
        ))
    }

    /// The directory being swept.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Delete expired dump files, returning how many were deleted.
    pub fn cleanup(&self) -> Result<usize, SweepError> {
        self.cleanup_at(SystemTime::now())
    }

    /// Delete dump files more than the retention window older than `now`.
    ///
    /// Files that cannot be inspected or deleted are logged and skipped, only listing the
    /// directory can fail the sweep.
    pub fn cleanup_at(&self, now: SystemTime) -> Result<usize, SweepError> {
        self.cleanup_with(now, |path| fs::remove_file(path))
    }

    /// Like [`Self::cleanup_at`], deleting each expired file with `remove_file`.
    pub fn cleanup_with<F>(&self, now: SystemTime, mut remove_file: F) -> Result<usize, SweepError>
    where
        F: FnMut(&Path) -> io::Result<()>,
    {
        fs::create_dir_all(&self.directory).map_err(|source| SweepError::Io {
            action: "create backup directory",
            path: self.directory.clone(),
            source,
        })?;

        let directory = fs::read_dir(&self.directory).map_err(|source| SweepError::Io {
            action: "read backup directory",
            path: self.directory.clone(),
            source,
        })?;

        let mut deleted = 0;

        for entry in directory {
            let entry = match entry {
                Ok(entry) => entry,
                Err(error) => {
                    warn!("{CONTEXT}Could not read entry: {error}");
                    continue;
                }
            };
            let path = entry.path();

            if !is_dump_file(&path) {
                continue;
            }

            let metadata = match entry.metadata() {
                Ok(metadata) => metadata,
                Err(error) => {
                    warn!("{CONTEXT}Could not get entry {path:?} metadata: {error}");
                    continue;
                }
            };

            if !metadata.is_file() {
                continue;
            }

            let modified = match metadata.modified() {
                Ok(modified) => modified,
                Err(error) => {
                    warn!("{CONTEXT}Could not get entry {path:?} modified time: {error}");
                    continue;
                }
            };

            let age = age_in_days(now, modified);
            if age <= self.keep_days {
                debug!("{CONTEXT}Keeping {path:?} ({age} days old)");
                continue;
            }

            match remove_file(&path) {
                Ok(()) => {
                    info!("{CONTEXT}Deleted old backup: {path:?} ({age} days old)");
                    deleted += 1;
                }
                Err(error) => warn!("{CONTEXT}Could not remove file {path:?}: {error}"),
            }
        }

        Ok(deleted)
    }
}

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("Failed to {action} {path:?}:\n{source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
