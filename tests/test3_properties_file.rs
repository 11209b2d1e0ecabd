#![cfg(feature = "sqlite")]

use std::fs;

use sql_props_loader::{
    LoadConfig, PropertiesFilePublisher, PropertyLoader, SettingsFile, SqlPropsError,
    WriterPublisher, load_properties,
};

const CONFIG_JSON: &str = r#"{
    "driverClassname": "sqlite",
    "connectionString": ":memory:",
    "sqlKey": "build-db",
    "selectStatement": "SELECT name, value FROM props ORDER BY rowid",
    "preSqlStatements": [
        { "kind": "dml", "sqlStatement": "CREATE TABLE props (name text, value text)" },
        null,
        { "kind": "dml", "sqlStatement": "INSERT INTO props VALUES ('app.version','2.0'), ('app.name','demo'), ('empty', NULL)" }
    ]
}"#;

const SETTINGS_JSON: &str = r#"{
    "servers": [
        { "id": "other", "username": "nobody", "password": "x" },
        { "id": "build-db", "username": "ci", "password": "hunter2" }
    ]
}"#;

#[test]
fn merges_into_existing_properties_file() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("load-props.json");
    let settings_path = dir.path().join("settings.json");
    let output = dir.path().join("build.properties");
    fs::write(&config_path, CONFIG_JSON).unwrap();
    fs::write(&settings_path, SETTINGS_JSON).unwrap();
    fs::write(
        &output,
        "# build settings\napp.version=1.0\n\n! pinned by hand\nkeep=me\n",
    ).unwrap();

    let config = LoadConfig::from_path(&config_path).unwrap();
    assert_eq!(config.pre_sql_statements.len(), 3);

    let settings = SettingsFile::from_path(&settings_path).unwrap();
    let mut publisher = PropertiesFilePublisher::new(&output);
    let mapping = load_properties(&config, settings, &mut publisher).unwrap();
    assert_eq!(mapping.len(), 3);

    let written = fs::read_to_string(&output).unwrap();
    assert_eq!(
        written,
        "# build settings\napp.version=2.0\n\n! pinned by hand\nkeep=me\napp.name=demo\nempty=\n"
    );
}

#[test]
fn creates_missing_properties_file() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("fresh.properties");
    let config: LoadConfig = serde_json::from_str(CONFIG_JSON).unwrap();
    let settings = SettingsFile::from_json(SETTINGS_JSON).unwrap();

    let mut publisher = PropertiesFilePublisher::new(&output);
    PropertyLoader::new()
        .with_credentials(settings)
        .load(&config, &mut publisher)
        .unwrap();

    let written = fs::read_to_string(&output).unwrap();
    assert!(written.starts_with("app.version=2.0\n"));
}

#[test]
fn unknown_sql_key_leaves_file_alone() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("build.properties");
    fs::write(&output, "keep=me\n").unwrap();

    let mut config: LoadConfig = serde_json::from_str(CONFIG_JSON).unwrap();
    config.sql_key = Some("missing".into());
    let settings = SettingsFile::from_json(SETTINGS_JSON).unwrap();

    let err = load_properties(&config, settings, &mut PropertiesFilePublisher::new(&output))
        .unwrap_err();

    assert!(matches!(err, SqlPropsError::ConfigError(_)));
    assert_eq!(fs::read_to_string(&output).unwrap(), "keep=me\n");
}

#[test]
fn writer_publisher_renders_properties() {
    let config: LoadConfig = serde_json::from_str(CONFIG_JSON).unwrap();
    let settings = SettingsFile::from_json(SETTINGS_JSON).unwrap();

    let mut publisher = WriterPublisher::new(Vec::new());
    load_properties(&config, settings, &mut publisher).unwrap();

    let out = String::from_utf8(publisher.into_inner()).unwrap();
    assert_eq!(out, "app.version=2.0\napp.name=demo\nempty=\n");
}
