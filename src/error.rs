//! Error types for the position engine.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unknown strategy: {0}")]
    UnknownStrategy(String),

    #[error("Legacy conversion not supported: {0}")]
    UnsupportedLegacy(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type EngineResult<T> = Result<T, EngineError>;

impl EngineError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn unsupported_legacy(msg: impl Into<String>) -> Self {
        Self::UnsupportedLegacy(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

impl From<garde::Report> for EngineError {
    fn from(report: garde::Report) -> Self {
        Self::InvalidInput(report.to_string())
    }
}
