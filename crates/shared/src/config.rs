use std::{
    ffi::OsStr,
    fs, io,
    path::{self, Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The database engine the backups are taken from.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Engine {
    /// A MySQL or MariaDB server.
    #[default]
    Mysql,

    /// SQLite database files in a directory.
    Sqlite,
}

/// How to reach the databases being backed up.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// The database engine.
    pub engine: Engine,

    /// The server host name or IP address.
    pub host: String,

    /// The server port.
    pub port: u16,

    /// The user to connect as.
    pub user: String,

    /// The user's password.
    pub password: String,

    /// The directory holding `{database}.db` files. Only used by SQLite.
    pub data_directory: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            engine: Engine::Mysql,
            host: "localhost".to_string(),
            port: 3306,
            user: "root".to_string(),
            password: String::new(),
            data_directory: PathBuf::from("."),
        }
    }
}

/// Where dumps are written and how long they are kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackupConfig {
    /// The directory dump files are written to.
    #[serde(alias = "backupPath")]
    pub backup_path: PathBuf,

    /// The number of whole days a dump file is kept for.
    #[serde(alias = "keepBackups")]
    pub keep_backups: u64,

    /// The databases to dump, in order.
    pub databases: Vec<String>,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            backup_path: PathBuf::from("backups"),
            keep_backups: 30,
            databases: Vec::new(),
        }
    }
}

/// The backup config
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// The database connection.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// The backup destination and retention.
    #[serde(default)]
    pub backup: BackupConfig,

    /// The directory relative paths are resolved against.
    #[serde(skip)]
    pub base_directory: PathBuf,
}

/// The config file written by `init`.
pub const DEFAULT_CONFIG_FILE: &str = "./config.toml";
const CONFIG_FILES: [&str; 2] = [DEFAULT_CONFIG_FILE, "./config.json"];

impl Config {
    /// Loads `./config.toml`, falling back to a legacy `./config.json`.
    pub fn load_default() -> Result<Self, LoadConfigError> {
        let file_path = CONFIG_FILES
            .into_iter()
            .map(Path::new)
            .find(|path| path.exists())
            .unwrap_or(Path::new(DEFAULT_CONFIG_FILE));

        Self::load(file_path)
    }

    /// Tries to load a config file. `.json` files are read as JSON, anything else as TOML.
    pub fn load(file_path: &Path) -> Result<Self, LoadConfigError> {
        if !file_path.exists() {
            return Err(LoadConfigError::NoFile(file_path.to_path_buf()));
        }

        let contents = fs::read_to_string(file_path).map_err(LoadConfigError::Read)?;

        let mut config: Self = match file_path.extension().and_then(OsStr::to_str) {
            Some("json") => serde_json::from_str(&contents)?,
            _ => toml::from_str(&contents)?,
        };
        config.base_directory = file_path.parent().map(Path::to_path_buf).unwrap_or_default();

        Ok(config)
    }

    /// Writes the config to a toml file.
    pub fn save_toml(&self, file_path: &Path) -> Result<(), SaveConfigError> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(file_path, contents).map_err(SaveConfigError::Write)?;
        Ok(())
    }

    /// The absolute path of the backup directory.
    pub fn backup_directory(&self) -> io::Result<PathBuf> {
        resolve_directory(&self.base_directory, &self.backup.backup_path)
    }

    /// The absolute path of the SQLite data directory.
    pub fn data_directory(&self) -> io::Result<PathBuf> {
        resolve_directory(&self.base_directory, &self.database.data_directory)
    }
}

/// Resolves `path` against `base` unless it is already absolute.
pub fn resolve_directory(base: &Path, path: &Path) -> io::Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }

    path::absolute(base.join(path))
}

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum LoadConfigError {
    #[error("The file {0:?} does not exist.")]
    NoFile(PathBuf),

    #[error("Failed to read the file:\n{0}")]
    Read(#[source] io::Error),

    #[error("Failed to deserialize the file:\n{0}")]
    DeserializeToml(#[from] toml::de::Error),

    #[error("Failed to deserialize the file:\n{0}")]
    DeserializeJson(#[from] serde_json::Error),
}

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum SaveConfigError {
    #[error("Failed to serialize config:\n{0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Failed to write config file:\n{0}")]
    Write(#[source] io::Error),
}
