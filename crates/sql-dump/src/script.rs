//! The dump script text.
//!

use core::fmt::Write;

use chrono::NaiveDateTime;

use crate::value::{SqlValue, quote_identifier};

/// A table's schema and every row at the time it was read.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSnapshot {
    /// The table name.
    pub name: String,

    /// The table's `CREATE TABLE` statement, without a trailing `;`.
    pub create_statement: String,

    /// The rows in the order they were returned.
    pub rows: Vec<Vec<SqlValue>>,
}

/// A SQL script that recreates a database's tables and their rows.
#[derive(Debug, Clone)]
pub struct DumpScript {
    text: String,
}

impl DumpScript {
    /// Starts a script with the header comment.
    pub fn new(database_name: &str, date: NaiveDateTime) -> Self {
        let text = format!(
            "-- Database Backup: {database_name}\n-- Backup Date: {}\n\n",
            date.format("%Y-%m-%d %H:%M:%S")
        );

        Self { text }
    }

    /// Appends a table: drop, create, then a single insert if there are any rows.
    pub fn push_table(&mut self, table: &TableSnapshot) {
        let name = quote_identifier(&table.name);

        // Writing to a String cannot fail.
        let _ = write!(
            self.text,
            "\n-- Table: {}\nDROP TABLE IF EXISTS {name};\n{};\n\n",
            table.name, table.create_statement
        );

        if table.rows.is_empty() {
            return;
        }

        let _ = writeln!(self.text, "INSERT INTO {name} VALUES");
        for (index, row) in table.rows.iter().enumerate() {
            if index > 0 {
                self.text.push_str(",\n");
            }
            self.push_tuple(row);
        }
        self.text.push_str(";\n\n");
    }

    fn push_tuple(&mut self, row: &[SqlValue]) {
        self.text.push('(');
        for (index, value) in row.iter().enumerate() {
            if index > 0 {
                self.text.push_str(", ");
            }
            let _ = write!(self.text, "{value}");
        }
        self.text.push(')');
    }

    /// The script so far.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Consumes the script, returning its text.
    pub fn into_string(self) -> String {
        self.text
    }
}
