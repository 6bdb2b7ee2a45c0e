//! Conference bot configuration system.
//!
//! Provides TOML-based configuration with environment overrides for
//! secrets and full validation. All config sections use defaults so
//! partial configs work out of the box.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use confbot_config::{load_config, config_to_json};
//!
//! let config = load_config(None).expect("failed to load config");
//! let json = config_to_json(&config);
//! println!("{json}");
//! ```

pub mod env;
pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use env::apply_env_overrides;
pub use schema::{ConfbotConfig, CONFIG_SCHEMA_VERSION};

use std::path::Path;

use confbot_common::ConfigError;

/// Load config from `path`, or from the platform default path when `None`.
///
/// Applies environment overrides for secrets. Validation is a separate
/// step (see [`validation::validate`]) so callers can layer CLI overrides
/// on top before checking ranges.
pub fn load_config(path: Option<&Path>) -> Result<ConfbotConfig, ConfigError> {
    let mut config = match path {
        Some(path) => toml_loader::load_from_path(path)?,
        None => toml_loader::load_default()?,
    };
    apply_env_overrides(&mut config);
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string with secrets removed.
pub fn config_to_json(config: &ConfbotConfig) -> String {
    let mut redacted = config.clone();
    if redacted.completion.api_key.is_some() {
        redacted.completion.api_key = Some("[REDACTED]".into());
    }
    serde_json::to_string_pretty(&redacted)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_to_json_contains_all_sections() {
        let config = ConfbotConfig::default();
        let json = config_to_json(&config);
        assert!(json.contains("\"server\""));
        assert!(json.contains("\"completion\""));
        assert!(json.contains("\"rate_limit\""));
        assert!(json.contains("\"sessions\""));
        assert!(json.contains("\"catalog\""));
        assert!(json.contains("\"logging\""));
    }

    #[test]
    fn config_to_json_redacts_api_key() {
        let mut config = ConfbotConfig::default();
        config.completion.api_key = Some("sk-secret".into());
        let json = config_to_json(&config);
        assert!(!json.contains("sk-secret"));
        assert!(json.contains("[REDACTED]"));
    }

    #[test]
    fn config_schema_version_is_1() {
        assert_eq!(CONFIG_SCHEMA_VERSION, 1);
    }

    #[test]
    fn load_config_from_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[catalog]\npath = \"/data/program.json\"\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.catalog.path, Path::new("/data/program.json"));
    }

    #[test]
    fn default_config_round_trips_through_json() {
        let config = ConfbotConfig::default();
        let json = config_to_json(&config);
        let parsed: ConfbotConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.server.port, 5215);
        assert_eq!(parsed.completion.model, "gpt-4o-mini");
    }
}
