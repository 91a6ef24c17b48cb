//! Configuration errors

use enviro_core::EnviroError;

/// Errors raised while loading or resolving station configuration
#[derive(Debug, thiserror_no_std::Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {message}")]
    Io { path: String, message: String },

    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    #[error("Compensation document has no coefficients for {0}")]
    MissingVariant(&'static str),

    #[error("Profile not found: {0}")]
    NotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Engine rejected settings: {0}")]
    Engine(EnviroError),
}

impl ConfigError {
    pub(crate) fn io(path: &std::path::Path, err: std::io::Error) -> Self {
        Self::Io { path: path.display().to_string(), message: err.to_string() }
    }

    pub(crate) fn poisoned() -> Self {
        Self::Invalid("Lock poisoned".to_string())
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

impl From<EnviroError> for ConfigError {
    fn from(err: EnviroError) -> Self {
        Self::Engine(err)
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;
