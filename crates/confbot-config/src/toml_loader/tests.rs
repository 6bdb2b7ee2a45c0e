//! Tests for TOML config loading, creation, and path resolution.

use super::*;
use crate::schema::{ApiFlavor, ConcurrentRunPolicy};
use std::path::Path;

#[test]
fn load_from_nonexistent_returns_file_not_found() {
    let result = load_from_path(Path::new("/tmp/nonexistent_confbot_config.toml"));
    let err = result.unwrap_err();
    assert!(matches!(err, confbot_common::ConfigError::FileNotFound(_)));
}

#[test]
fn load_valid_partial_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r##"
[server]
port = 8080

[completion]
flavor = "azure"
endpoint = "https://contoso.openai.azure.com"
model = "gpt4o-deployment"

[sessions]
max_tool_rounds = 5
concurrent_run = "reject"
"##,
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.completion.flavor, ApiFlavor::Azure);
    assert_eq!(config.completion.model, "gpt4o-deployment");
    assert_eq!(config.sessions.max_tool_rounds(), Some(5));
    assert_eq!(config.sessions.concurrent_run, ConcurrentRunPolicy::Reject);
    // Defaults preserved
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.rate_limit.permit_limit, 100);
    assert_eq!(config.sessions.idle_ttl(), None);
}

#[test]
fn load_invalid_toml_returns_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "this is not valid toml {{{").unwrap();

    let err = load_from_path(&path).unwrap_err();
    assert!(matches!(err, confbot_common::ConfigError::ParseError(_)));
}

#[test]
fn load_does_not_validate() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[server]\nport = 0\n").unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.server.port, 0);
}

#[test]
fn create_and_load_default_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("confbot").join("config.toml");

    create_default_config(&path).unwrap();
    assert!(path.exists());

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.server.port, 5215);
    assert_eq!(config.catalog.path, Path::new("sessions.json"));
}

#[test]
fn default_config_toml_is_valid() {
    use super::template::default_config_toml;
    use crate::schema::ConfbotConfig;

    let content = default_config_toml();
    let config: ConfbotConfig = toml::from_str(&content).unwrap();
    assert_eq!(config.rate_limit.window_secs, 10);
    assert!(crate::validation::validate(&config).is_ok());
}

#[test]
fn default_config_path_is_reasonable() {
    if let Ok(path) = default_config_path() {
        let path_str = path.to_string_lossy();
        assert!(path_str.contains("confbot"));
        assert!(path_str.ends_with("config.toml"));
    }
}
