//! Environment variable overrides applied after the file is parsed.

use crate::schema::ConfbotConfig;

/// Fill in secrets that are not stored in the config file.
///
/// The API key is read from the flavor's environment variable
/// (`OPENAI_API_KEY` or `AZURE_OPENAI_API_KEY`) when the file leaves it
/// unset or empty.
pub fn apply_env_overrides(config: &mut ConfbotConfig) {
    apply_with(config, |key| std::env::var(key).ok());
}

pub(crate) fn apply_with(config: &mut ConfbotConfig, lookup: impl Fn(&str) -> Option<String>) {
    let has_key = config
        .completion
        .api_key
        .as_deref()
        .is_some_and(|k| !k.trim().is_empty());
    if !has_key {
        config.completion.api_key = lookup(config.completion.flavor.api_key_env())
            .filter(|k| !k.trim().is_empty());
    }
}
