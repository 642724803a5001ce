use std::path::Path;

use chrono::NaiveDateTime;

/// The extension every dump file has.
pub const DUMP_FILE_EXTENSION: &str = "sql";

/// The file name of a dump: `{database}_{YYYY-MM-DD_HH-mm-ss}.sql`.
pub fn dump_file_name(database_name: &str, timestamp: NaiveDateTime) -> String {
    format!(
        "{database_name}_{}.{DUMP_FILE_EXTENSION}",
        timestamp.format("%Y-%m-%d_%H-%M-%S")
    )
}

/// Returns if the file name ends in the dump file extension.
pub fn is_dump_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(&format!(".{DUMP_FILE_EXTENSION}")))
}
