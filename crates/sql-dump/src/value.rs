//! Column values and how they are written as SQL literals.
//!

use core::fmt;

/// A single column value read from a row.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// A database `NULL`.
    Null,

    /// A signed integer.
    Int(i64),

    /// An unsigned integer.
    UInt(u64),

    /// A floating point number.
    Float(f64),

    /// Text, including anything the database hands back as a string.
    Text(String),

    /// Raw bytes. Written lossily as UTF-8 text.
    Bytes(Vec<u8>),
}

impl SqlValue {
    /// Returns if this value is written unquoted.
    pub fn is_numeric(&self) -> bool {
        match self {
            Self::Int(_) | Self::UInt(_) => true,
            Self::Float(float) => float.is_finite(),
            _ => false,
        }
    }
}

/// Writes the value as a SQL literal.
///
/// `NULL` stays bare, numbers are unquoted, everything else is wrapped in single quotes with
/// embedded single quotes doubled. No other escaping happens. Whole floats keep a `.0` so they
/// are read back as floats.
impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Int(int) => write!(f, "{int}"),
            Self::UInt(uint) => write!(f, "{uint}"),
            Self::Float(float) if self.is_numeric() && float.fract() == 0.0 => {
                write!(f, "{float}.0")
            }
            Self::Float(float) if self.is_numeric() => write!(f, "{float}"),
            Self::Float(float) => write_quoted(f, &float.to_string()),
            Self::Text(text) => write_quoted(f, text),
            Self::Bytes(bytes) => write_quoted(f, &String::from_utf8_lossy(bytes)),
        }
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    write!(f, "'{}'", text.replace('\'', "''"))
}

/// Wraps a table name in backticks, doubling any backticks inside it.
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}
