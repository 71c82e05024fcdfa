//! Application error type
//!
//! Every fallible operation in the crate returns `AppResult<T>`. Variants are
//! serializable so a front end can render them without string matching.

use thiserror::Error;
use serde::Serialize;

#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "message")]
pub enum AppError {
    #[error("I/O Error: {0}")]
    Io(String),

    #[error("Network Error: {0}")]
    Network(String),

    /// The rate gateway answered, but not with a successful result
    #[error("Gateway Error: {0}")]
    Gateway(String),

    #[error("System Error: {0}")]
    System(String),

    #[error("Calculation Error: {0}")]
    Calculation(String),

    #[error("Validation Error: {0}")]
    Validation(String),

    #[error("Config Error: {0}")]
    Config(String),
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Validation(format!("Serialization error: {}", err))
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_type_and_message() {
        let err = AppError::Validation("Unknown unit: parsec".to_string());
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["type"], "Validation");
        assert_eq!(json["message"], "Unknown unit: parsec");
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: AppError = io.into();
        assert!(matches!(err, AppError::Io(msg) if msg.contains("missing")));
    }
}
