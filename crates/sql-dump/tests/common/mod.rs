//! # common
//!

#![allow(dead_code)]

use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::Connection;
use sql_dump::{SqlValue, TableSnapshot};

/// The timestamp test dumps are taken at.
pub fn timestamp() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 5)
        .unwrap()
        .and_hms_opt(9, 3, 7)
        .unwrap()
}

/// Create `{directory}/shop.db` with a populated table and an empty one.
pub fn create_shop_database(directory: &Path) {
    let connection = Connection::open(directory.join("shop.db")).unwrap();
    connection
        .execute_batch(
            "CREATE TABLE customers (id INTEGER PRIMARY KEY, name TEXT NOT NULL, balance REAL, note TEXT);
             CREATE TABLE audit_log (id INTEGER PRIMARY KEY, message TEXT);
             INSERT INTO customers VALUES (1, 'Ada', 1000, NULL);
             INSERT INTO customers VALUES (2, 'O''Brien', 12.5, 'said \"hi\"');
             INSERT INTO customers VALUES (3, 'Grace', -3.25, 'line one
line two');",
        )
        .unwrap();
}

/// Every row of `table`, in rowid order.
pub fn read_rows(connection: &Connection, table: &str) -> Vec<Vec<rusqlite::types::Value>> {
    let mut statement = connection
        .prepare(&format!("SELECT * FROM {table} ORDER BY rowid"))
        .unwrap();
    let column_count = statement.column_count();

    statement
        .query_map([], |row| {
            (0..column_count)
                .map(|index| row.get::<_, rusqlite::types::Value>(index))
                .collect::<rusqlite::Result<Vec<_>>>()
        })
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap()
}

/// The `CREATE TABLE` statements of every table, in listing order.
pub fn read_schema(connection: &Connection) -> Vec<(String, String)> {
    let mut statement = connection
        .prepare("SELECT name, sql FROM sqlite_master WHERE type = 'table'")
        .unwrap();

    statement
        .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap()
}

/// A table snapshot for mock sources.
pub fn table(name: &str, rows: Vec<Vec<SqlValue>>) -> TableSnapshot {
    TableSnapshot {
        name: name.to_string(),
        create_statement: format!("CREATE TABLE `{name}` (\n  `id` int NOT NULL\n)"),
        rows,
    }
}
