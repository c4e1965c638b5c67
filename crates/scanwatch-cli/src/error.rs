//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// SDK error
    #[error(transparent)]
    Sdk(#[from] scanwatch_sdk::SdkError),

    /// Walk or detection failure
    #[error("{0}")]
    Engine(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Operation not permitted
    #[error("Operation not permitted: {0}")]
    NotPermitted(String),

    /// Issue reporter failed
    #[error("Reporter error: {0}")]
    Reporter(String),
}

impl<E: std::fmt::Display> From<scanwatch_engine::EngineError<E>> for CliError {
    fn from(e: scanwatch_engine::EngineError<E>) -> Self {
        CliError::Engine(e.to_string())
    }
}

impl From<scanwatch_engine::ConfigError> for CliError {
    fn from(e: scanwatch_engine::ConfigError) -> Self {
        CliError::Config(e.to_string())
    }
}
