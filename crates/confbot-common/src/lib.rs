//! Types shared by every confbot crate: error taxonomy and identifiers.

pub mod errors;
pub mod id;

pub use errors::{ConfbotError, ConfigError};
pub use id::SessionId;

pub type Result<T> = std::result::Result<T, ConfbotError>;
