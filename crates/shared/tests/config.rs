//! Tests for loading config
//!

use std::{fs, path::PathBuf};

use shared::{Config, Engine, LoadConfigError, resolve_directory};

#[test]
fn load_toml() {
    let directory = tempfile::tempdir().unwrap();
    let path = directory.path().join("config.toml");
    fs::write(
        &path,
        r#"
[database]
engine = "sqlite"
data_directory = "data"

[backup]
backup_path = "dumps"
keep_backups = 7
databases = ["shop", "blog"]
"#,
    )
    .unwrap();

    let config = Config::load(&path).unwrap();

    assert_eq!(config.database.engine, Engine::Sqlite);
    assert_eq!(config.database.port, 3306);
    assert_eq!(config.backup.keep_backups, 7);
    assert_eq!(config.backup.databases, vec!["shop", "blog"]);
    assert_eq!(
        config.backup_directory().unwrap(),
        directory.path().join("dumps")
    );
    assert_eq!(
        config.data_directory().unwrap(),
        directory.path().join("data")
    );
}

#[test]
fn load_legacy_json() {
    let directory = tempfile::tempdir().unwrap();
    let path = directory.path().join("config.json");
    fs::write(
        &path,
        r#"{
            "database": { "host": "db.internal", "port": 3307, "user": "backup", "password": "secret" },
            "backup": { "backupPath": "/var/backups/sql", "keepBackups": 14 }
        }"#,
    )
    .unwrap();

    let config = Config::load(&path).unwrap();

    assert_eq!(config.database.engine, Engine::Mysql);
    assert_eq!(config.database.host, "db.internal");
    assert_eq!(config.database.port, 3307);
    assert_eq!(config.backup.keep_backups, 14);
    assert!(config.backup.databases.is_empty());
    assert_eq!(
        config.backup_directory().unwrap(),
        PathBuf::from("/var/backups/sql")
    );
}

#[test]
fn missing_file() {
    let directory = tempfile::tempdir().unwrap();
    let result = Config::load(&directory.path().join("missing.toml"));
    assert!(matches!(result, Err(LoadConfigError::NoFile(_))));
}

#[test]
fn negative_retention_is_rejected() {
    let directory = tempfile::tempdir().unwrap();
    let path = directory.path().join("config.toml");
    fs::write(&path, "[backup]\nkeep_backups = -1\n").unwrap();

    let result = Config::load(&path);
    assert!(matches!(result, Err(LoadConfigError::DeserializeToml(_))));
}

#[test]
fn default_round_trips_through_toml() {
    let contents = toml::to_string_pretty(&Config::default()).unwrap();
    let config: Config = toml::from_str(&contents).unwrap();

    assert_eq!(config.backup.backup_path, PathBuf::from("backups"));
    assert_eq!(config.backup.keep_backups, 30);
    assert_eq!(config.database.host, "localhost");
}

#[test]
fn relative_directory_is_made_absolute() {
    let resolved = resolve_directory(&PathBuf::new(), &PathBuf::from("backups")).unwrap();
    assert!(resolved.is_absolute());
    assert!(resolved.ends_with("backups"));
}
