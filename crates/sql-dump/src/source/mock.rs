use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use super::{DatabaseSource, SourceConnection, SourceError};
use crate::{SqlValue, TableSnapshot};

/// Mock a database source with in-memory tables.
#[derive(Debug, Clone, Default)]
pub struct Mock {
    /// The tables of each database, in listing order.
    pub databases: HashMap<String, Vec<TableSnapshot>>,

    /// Reading the rows of this table fails.
    pub failing_table: Option<String>,

    /// Closing connections fails.
    pub failing_close: bool,

    open_connections: Arc<AtomicUsize>,
}

impl Mock {
    /// Add a database with the given tables.
    pub fn with_database(mut self, database_name: &str, tables: Vec<TableSnapshot>) -> Self {
        self.databases.insert(database_name.to_string(), tables);
        self
    }

    /// Fail when the rows of `table` are read.
    pub fn failing_on(mut self, table: &str) -> Self {
        self.failing_table = Some(table.to_string());
        self
    }

    /// Fail when a connection is closed.
    pub fn failing_close(mut self) -> Self {
        self.failing_close = true;
        self
    }

    /// The number of connections that have been opened and not yet dropped.
    pub fn open_connections(&self) -> usize {
        self.open_connections.load(Ordering::SeqCst)
    }
}

impl DatabaseSource for Mock {
    fn connect(&self, database_name: &str) -> Result<Box<dyn SourceConnection>, SourceError> {
        let tables = self.databases.get(database_name).ok_or_else(|| {
            SourceError::connect(database_name, format!("Unknown database '{database_name}'"))
        })?;

        self.open_connections.fetch_add(1, Ordering::SeqCst);

        Ok(Box::new(MockConnection {
            tables: tables.clone(),
            failing_table: self.failing_table.clone(),
            failing_close: self.failing_close,
            open_connections: Arc::clone(&self.open_connections),
        }))
    }
}

struct MockConnection {
    tables: Vec<TableSnapshot>,
    failing_table: Option<String>,
    failing_close: bool,
    open_connections: Arc<AtomicUsize>,
}

impl MockConnection {
    fn table(&self, table: &str) -> Result<&TableSnapshot, SourceError> {
        self.tables
            .iter()
            .find(|snapshot| snapshot.name == table)
            .ok_or_else(|| {
                SourceError::query(
                    format!("find table '{table}'"),
                    format!("Table '{table}' doesn't exist"),
                )
            })
    }
}

impl SourceConnection for MockConnection {
    fn list_tables(&mut self) -> Result<Vec<String>, SourceError> {
        Ok(self.tables.iter().map(|table| table.name.clone()).collect())
    }

    fn create_statement(&mut self, table: &str) -> Result<String, SourceError> {
        Ok(self.table(table)?.create_statement.clone())
    }

    fn rows(&mut self, table: &str) -> Result<Vec<Vec<SqlValue>>, SourceError> {
        if self.failing_table.as_deref() == Some(table) {
            return Err(SourceError::query(
                format!("select rows from '{table}'"),
                "Lost connection to server during query",
            ));
        }

        Ok(self.table(table)?.rows.clone())
    }

    fn close(self: Box<Self>) -> Result<(), SourceError> {
        if self.failing_close {
            return Err(SourceError::query("close connection", "Broken pipe"));
        }

        Ok(())
    }
}

impl Drop for MockConnection {
    fn drop(&mut self) {
        self.open_connections.fetch_sub(1, Ordering::SeqCst);
    }
}
