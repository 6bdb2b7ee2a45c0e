use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// Top-level error for process startup and wiring.
///
/// Request-level failures have their own types closer to where they occur;
/// this enum is what `main` reports before exiting.
#[derive(Debug, thiserror::Error)]
pub enum ConfbotError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("catalog error: {0}")]
    Catalog(String),

    #[error("completion client error: {0}")]
    Completion(String),

    #[error("server error: {0}")]
    Server(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::FileNotFound(PathBuf::from("/tmp/missing.toml"));
        assert_eq!(err.to_string(), "config file not found: /tmp/missing.toml");

        let err = ConfigError::ParseError("unexpected token".into());
        assert_eq!(err.to_string(), "config parse error: unexpected token");

        let err = ConfigError::ValidationError("server.port = 0 is out of range".into());
        assert_eq!(
            err.to_string(),
            "config validation error: server.port = 0 is out of range"
        );
    }

    #[test]
    fn confbot_error_from_config() {
        let config_err = ConfigError::ParseError("bad toml".into());
        let err: ConfbotError = config_err.into();
        assert!(matches!(err, ConfbotError::Config(_)));
        assert!(err.to_string().contains("bad toml"));
    }

    #[test]
    fn confbot_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "sessions.json");
        let err: ConfbotError = io_err.into();
        assert!(matches!(err, ConfbotError::Io(_)));
        assert!(err.to_string().contains("sessions.json"));
    }

    #[test]
    fn confbot_error_other_variants() {
        let err = ConfbotError::Catalog("no sessions".into());
        assert_eq!(err.to_string(), "catalog error: no sessions");

        let err = ConfbotError::Completion("missing api key".into());
        assert_eq!(err.to_string(), "completion client error: missing api key");

        let err = ConfbotError::Server("address in use".into());
        assert_eq!(err.to_string(), "server error: address in use");
    }
}
