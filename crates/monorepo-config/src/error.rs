//! Error types for configuration loading

use monorepo_shared::{AppError, ErrorCode};
use thiserror::Error;

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is not set and has no default
    #[error("Required environment variable '{0}' is not set")]
    MissingVar(String),

    /// An environment variable is set but its value is not acceptable
    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue {
        /// Variable name
        key: String,
        /// Why the value was rejected
        reason: String,
    },

    /// A `.env` file exists but could not be read or parsed
    #[error("Failed to load env file: {0}")]
    EnvFile(#[from] dotenvy::Error),

    /// The tracing subscriber could not be installed
    #[error("Failed to initialize logging: {0}")]
    Logging(String),
}

impl ConfigError {
    pub(crate) fn invalid(key: &str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    /// Name of the offending variable, if the error is about one.
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::MissingVar(key) | Self::InvalidValue { key, .. } => Some(key),
            Self::EnvFile(_) | Self::Logging(_) => None,
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        let key = err.key().map(str::to_string);
        let message = err.to_string();
        match err {
            ConfigError::MissingVar(_) | ConfigError::InvalidValue { .. } => {
                AppError::validation(message, key.as_deref())
            }
            ConfigError::EnvFile(_) | ConfigError::Logging(_) => {
                AppError::new(message).with_code(ErrorCode::Custom("CONFIG_ERROR".to_string()))
            }
        }
    }
}
