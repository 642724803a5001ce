use ::mysql::{Conn, OptsBuilder, Row, Value, prelude::Queryable};
use shared::DatabaseConfig;

use super::{DatabaseSource, SourceConnection, SourceError};
use crate::{SqlValue, value::quote_identifier};

/// Read tables from a MySQL server.
#[derive(Debug, Clone)]
pub struct MySql {
    /// The server host name or IP address.
    pub host: String,

    /// The server port.
    pub port: u16,

    /// The user to connect as.
    pub user: String,

    /// The user's password.
    pub password: String,
}

impl MySql {
    /// Take the connection parameters from config.
    pub fn from_config(config: &DatabaseConfig) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
            user: config.user.clone(),
            password: config.password.clone(),
        }
    }
}

impl DatabaseSource for MySql {
    fn connect(&self, database_name: &str) -> Result<Box<dyn SourceConnection>, SourceError> {
        let options = OptsBuilder::new()
            .ip_or_hostname(Some(self.host.as_str()))
            .tcp_port(self.port)
            .user(Some(self.user.as_str()))
            .pass(Some(self.password.as_str()))
            .db_name(Some(database_name));

        let connection =
            Conn::new(options).map_err(|error| SourceError::connect(database_name, error))?;

        Ok(Box::new(MySqlConnection { connection }))
    }
}

/// Lists base tables only, leaving out views.
const LIST_TABLES: &str = "SHOW FULL TABLES WHERE Table_type = 'BASE TABLE'";

struct MySqlConnection {
    connection: Conn,
}

impl SourceConnection for MySqlConnection {
    fn list_tables(&mut self) -> Result<Vec<String>, SourceError> {
        let action = "list tables";

        // Views have no rows of their own to restore.
        let rows = self
            .connection
            .query::<Row, _>(LIST_TABLES)
            .map_err(|error| SourceError::query(action, error))?;

        rows.iter().map(|row| text_column(row, 0, action)).collect()
    }

    fn create_statement(&mut self, table: &str) -> Result<String, SourceError> {
        let action = format!("show create table '{table}'");

        let row = self
            .connection
            .query_first::<Row, _>(format!("SHOW CREATE TABLE {}", quote_identifier(table)))
            .map_err(|error| SourceError::query(action.as_str(), error))?
            .ok_or_else(|| SourceError::UnexpectedResult(action.clone()))?;

        text_column(&row, 1, &action)
    }

    fn rows(&mut self, table: &str) -> Result<Vec<Vec<SqlValue>>, SourceError> {
        // Prepared statements use the binary protocol, so numbers stay numbers.
        let rows = self
            .connection
            .exec::<Row, _, _>(format!("SELECT * FROM {}", quote_identifier(table)), ())
            .map_err(|error| SourceError::query(format!("select rows from '{table}'"), error))?;

        let rows = rows
            .iter()
            .map(|row| {
                (0..row.len())
                    .map(|index| row.as_ref(index).map_or(SqlValue::Null, sql_value))
                    .collect()
            })
            .collect();

        Ok(rows)
    }

    fn close(self: Box<Self>) -> Result<(), SourceError> {
        // The connection sends `COM_QUIT` when dropped.
        drop(self);
        Ok(())
    }
}

fn text_column(row: &Row, index: usize, action: &str) -> Result<String, SourceError> {
    match row.get_opt::<String, usize>(index) {
        Some(Ok(text)) => Ok(text),
        Some(Err(error)) => Err(SourceError::query(action, error)),
        None => Err(SourceError::UnexpectedResult(action.to_string())),
    }
}

/// Convert a MySQL value into the value written to the dump.
pub(crate) fn sql_value(value: &Value) -> SqlValue {
    match value {
        Value::NULL => SqlValue::Null,
        Value::Int(int) => SqlValue::Int(*int),
        Value::UInt(uint) => SqlValue::UInt(*uint),
        // Go through the shortest decimal form so `1.1f32` is written as `1.1`.
        Value::Float(float) => SqlValue::Float(
            float
                .to_string()
                .parse()
                .unwrap_or_else(|_| f64::from(*float)),
        ),
        Value::Double(double) => SqlValue::Float(*double),
        Value::Bytes(bytes) => SqlValue::Text(String::from_utf8_lossy(bytes).into_owned()),
        Value::Date(year, month, day, hour, minute, second, micros) => {
            let mut text = format!("{year:04}-{month:02}-{day:02}");
            if (*hour, *minute, *second, *micros) != (0, 0, 0, 0) {
                text.push_str(&format!(" {hour:02}:{minute:02}:{second:02}"));
                push_micros(&mut text, *micros);
            }
            SqlValue::Text(text)
        }
        Value::Time(negative, days, hours, minutes, seconds, micros) => {
            let sign = if *negative { "-" } else { "" };
            let hours = u64::from(*days) * 24 + u64::from(*hours);
            let mut text = format!("{sign}{hours:02}:{minutes:02}:{seconds:02}");
            push_micros(&mut text, *micros);
            SqlValue::Text(text)
        }
    }
}

fn push_micros(text: &mut String, micros: u32) {
    if micros != 0 {
        text.push_str(&format!(".{micros:06}"));
    }
}

#[cfg(test)]
mod tests {
    use ::mysql::Value;

    use super::{LIST_TABLES, sql_value};
    use crate::SqlValue;

    #[test]
    fn views_are_not_listed() {
        assert!(LIST_TABLES.starts_with("SHOW FULL TABLES"));
        assert!(LIST_TABLES.ends_with("WHERE Table_type = 'BASE TABLE'"));
    }

    #[test]
    fn numbers_keep_their_type() {
        assert_eq!(sql_value(&Value::Int(-4)), SqlValue::Int(-4));
        assert_eq!(sql_value(&Value::UInt(u64::MAX)), SqlValue::UInt(u64::MAX));
        assert_eq!(sql_value(&Value::Float(1.1)), SqlValue::Float(1.1));
        assert_eq!(sql_value(&Value::Double(2.5)), SqlValue::Float(2.5));
    }

    #[test]
    fn bytes_become_text() {
        assert_eq!(
            sql_value(&Value::Bytes(b"12.50".to_vec())),
            SqlValue::Text("12.50".to_string())
        );
        assert_eq!(sql_value(&Value::NULL), SqlValue::Null);
    }

    #[test]
    fn dates() {
        assert_eq!(
            sql_value(&Value::Date(2024, 3, 9, 0, 0, 0, 0)),
            SqlValue::Text("2024-03-09".to_string())
        );
        assert_eq!(
            sql_value(&Value::Date(2024, 3, 9, 7, 5, 1, 0)),
            SqlValue::Text("2024-03-09 07:05:01".to_string())
        );
        assert_eq!(
            sql_value(&Value::Date(2024, 3, 9, 7, 5, 1, 250)),
            SqlValue::Text("2024-03-09 07:05:01.000250".to_string())
        );
    }

    #[test]
    fn times() {
        assert_eq!(
            sql_value(&Value::Time(false, 0, 8, 30, 0, 0)),
            SqlValue::Text("08:30:00".to_string())
        );
        assert_eq!(
            sql_value(&Value::Time(true, 2, 1, 0, 0, 0)),
            SqlValue::Text("-49:00:00".to_string())
        );
    }
}
