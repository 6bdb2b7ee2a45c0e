//! Full configuration validation.
//!
//! Each section has its own validator; this orchestrator calls them all
//! and collects errors into a single `ConfigError`.

mod helpers;
mod sections;

#[cfg(test)]
mod tests;

use crate::schema::ConfbotConfig;
use confbot_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &ConfbotConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    sections::validate_server(&mut errors, config);
    sections::validate_completion(&mut errors, config);
    sections::validate_rate_limit(&mut errors, config);
    sections::validate_sessions(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
