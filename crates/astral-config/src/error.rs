//! Errors raised while loading or validating Astral configuration.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or a value did not fit its field.
    #[error("failed to load astral configuration: {0}")]
    Figment(#[from] figment::Error),

    /// A section is in use but a field it depends on is empty.
    #[error("[{section}] is incomplete: {missing} must be set")]
    NotConfigured {
        section: &'static str,
        missing: &'static str,
    },

    /// A field holds a value the backend cannot start with.
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}
