use std::path::PathBuf;

use rusqlite::{Connection, OpenFlags, types::ValueRef};

use super::{DatabaseSource, SourceConnection, SourceError};
use crate::{SqlValue, value::quote_identifier};

/// Read tables from SQLite database files. The database `name` is the file `{name}.db`.
#[derive(Debug, Clone)]
pub struct Sqlite {
    /// The directory holding the database files.
    pub data_directory: PathBuf,
}

impl Sqlite {
    /// Create a source over the database files in `data_directory`.
    pub fn new(data_directory: PathBuf) -> Self {
        Self { data_directory }
    }

    /// The file backing a database.
    pub fn database_path(&self, database_name: &str) -> PathBuf {
        self.data_directory.join(format!("{database_name}.db"))
    }
}

impl DatabaseSource for Sqlite {
    fn connect(&self, database_name: &str) -> Result<Box<dyn SourceConnection>, SourceError> {
        // Read only, so a missing file is an error instead of a new empty database.
        let connection = Connection::open_with_flags(
            self.database_path(database_name),
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|error| SourceError::connect(database_name, error))?;

        Ok(Box::new(SqliteConnection { connection }))
    }
}

struct SqliteConnection {
    connection: Connection,
}

impl SourceConnection for SqliteConnection {
    fn list_tables(&mut self) -> Result<Vec<String>, SourceError> {
        let action = "list tables";

        let mut statement = self
            .connection
            .prepare(
                "SELECT name FROM sqlite_master \
                 WHERE type = 'table' AND substr(name, 1, 7) <> 'sqlite_'",
            )
            .map_err(|error| SourceError::query(action, error))?;

        let tables = statement
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(|error| SourceError::query(action, error))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|error| SourceError::query(action, error))?;

        Ok(tables)
    }

    fn create_statement(&mut self, table: &str) -> Result<String, SourceError> {
        self.connection
            .query_row(
                "SELECT sql FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [table],
                |row| row.get::<_, String>(0),
            )
            .map_err(|error| SourceError::query(format!("show create table '{table}'"), error))
    }

    fn rows(&mut self, table: &str) -> Result<Vec<Vec<SqlValue>>, SourceError> {
        let action = format!("select rows from '{table}'");

        let mut statement = self
            .connection
            .prepare(&format!("SELECT * FROM {}", quote_identifier(table)))
            .map_err(|error| SourceError::query(action.as_str(), error))?;
        let column_count = statement.column_count();

        let mut rows = statement
            .query([])
            .map_err(|error| SourceError::query(action.as_str(), error))?;

        let mut snapshot = Vec::new();
        while let Some(row) = rows
            .next()
            .map_err(|error| SourceError::query(action.as_str(), error))?
        {
            let values = (0..column_count)
                .map(|index| row.get_ref(index).map(sql_value))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|error| SourceError::query(action.as_str(), error))?;

            snapshot.push(values);
        }

        Ok(snapshot)
    }

    fn close(self: Box<Self>) -> Result<(), SourceError> {
        self.connection
            .close()
            .map_err(|(_, error)| SourceError::query("close the connection", error))
    }
}

fn sql_value(value: ValueRef<'_>) -> SqlValue {
    match value {
        ValueRef::Null => SqlValue::Null,
        ValueRef::Integer(int) => SqlValue::Int(int),
        ValueRef::Real(real) => SqlValue::Float(real),
        ValueRef::Text(text) => SqlValue::Text(String::from_utf8_lossy(text).into_owned()),
        ValueRef::Blob(blob) => SqlValue::Bytes(blob.to_vec()),
    }
}
