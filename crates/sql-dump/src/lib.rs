//! # sql-dump
//! Writes a database's tables and rows to a replayable SQL script.
//!

mod context;
mod producer;
pub mod script;
pub mod source;
mod value;

pub use context::Context;
pub use producer::{DumpError, DumpErrorKind, DumpProducer, DumpResult, DumpSummary, megabytes};
pub use script::{DumpScript, TableSnapshot};
pub use value::{SqlValue, quote_identifier};
