//! Database sources to read tables from.
//!

use std::{error, io};

use shared::{Config, Engine};
use thiserror::Error;

use crate::SqlValue;

mod mock;
mod mysql;
mod sqlite;

pub use self::{mock::Mock, mysql::MySql, sqlite::Sqlite};

/// A boxed error from a database driver.
pub type BoxError = Box<dyn error::Error + Send + Sync>;

/// A database server or store that connections can be opened to.
pub trait DatabaseSource {
    /// Open a connection scoped to `database_name`.
    fn connect(&self, database_name: &str) -> Result<Box<dyn SourceConnection>, SourceError>;
}

/// An open connection to a single database.
pub trait SourceConnection {
    /// The table names, in the order the database returns them.
    fn list_tables(&mut self) -> Result<Vec<String>, SourceError>;

    /// The table's `CREATE TABLE` statement.
    fn create_statement(&mut self, table: &str) -> Result<String, SourceError>;

    /// Every row in the table.
    fn rows(&mut self, table: &str) -> Result<Vec<Vec<SqlValue>>, SourceError>;

    /// Close the connection.
    fn close(self: Box<Self>) -> Result<(), SourceError>;
}

/// The configured database source.
#[allow(missing_docs)]
#[derive(Debug, Clone)]
pub enum Source {
    MySql(MySql),
    Sqlite(Sqlite),
}

impl Source {
    /// Create the source for the configured engine.
    pub fn from_config(config: &Config) -> io::Result<Self> {
        let source = match config.database.engine {
            Engine::Mysql => Self::MySql(MySql::from_config(&config.database)),
            Engine::Sqlite => Self::Sqlite(Sqlite::new(config.data_directory()?)),
        };

        Ok(source)
    }
}

impl DatabaseSource for Source {
    fn connect(&self, database_name: &str) -> Result<Box<dyn SourceConnection>, SourceError> {
        match self {
            Self::MySql(mysql) => mysql.connect(database_name),
            Self::Sqlite(sqlite) => sqlite.connect(database_name),
        }
    }
}

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to connect to database '{database}':\n{source}")]
    Connect {
        database: String,
        #[source]
        source: BoxError,
    },

    #[error("Failed to {action}:\n{source}")]
    Query {
        action: String,
        #[source]
        source: BoxError,
    },

    #[error("Unexpected result when trying to {0}")]
    UnexpectedResult(String),
}

impl SourceError {
    pub(crate) fn connect(database: &str, source: impl Into<BoxError>) -> Self {
        Self::Connect {
            database: database.to_string(),
            source: source.into(),
        }
    }

    pub(crate) fn query(action: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Query {
            action: action.into(),
            source: source.into(),
        }
    }
}
