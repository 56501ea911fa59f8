// --- File: crates/atelier_common/src/error.rs ---
use std::fmt;
use thiserror::Error;

/// The request-facing error type shared by all Atelier crates.
///
/// Domain errors (workflow, storage, providers) are converted into this enum at
/// the HTTP boundary. The `Display` text of every variant is what the end user
/// sees, so variants carrying provider detail must be built with a generic
/// message and the detail logged separately.
#[derive(Error, Debug)]
pub enum AtelierError {
    /// Missing or malformed input, correctable by the user
    #[error("{0}")]
    ValidationError(String),

    /// Error occurred due to missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Error occurred during a storage operation
    #[error("{0}")]
    StorageError(String),

    /// Error occurred during an external service call
    #[error("{message}")]
    ExternalServiceError {
        service_name: String,
        message: String,
    },

    /// Error occurred due to an internal error
    #[error("{0}")]
    InternalError(String),
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for AtelierError {
    fn status_code(&self) -> u16 {
        match self {
            AtelierError::ValidationError(_) => 400,
            AtelierError::ConfigError(_) => 500,
            AtelierError::StorageError(_) => 500,
            AtelierError::ExternalServiceError { .. } => 500,
            AtelierError::InternalError(_) => 500,
        }
    }
}

// Utility functions for error handling
pub fn config_error<T: fmt::Display>(message: T) -> AtelierError {
    AtelierError::ConfigError(message.to_string())
}

pub fn validation_error<T: fmt::Display>(message: T) -> AtelierError {
    AtelierError::ValidationError(message.to_string())
}

pub fn storage_error<T: fmt::Display>(message: T) -> AtelierError {
    AtelierError::StorageError(message.to_string())
}

pub fn external_service_error<T: fmt::Display>(service_name: &str, message: T) -> AtelierError {
    AtelierError::ExternalServiceError {
        service_name: service_name.to_string(),
        message: message.to_string(),
    }
}

pub fn internal_error<T: fmt::Display>(message: T) -> AtelierError {
    AtelierError::InternalError(message.to_string())
}
