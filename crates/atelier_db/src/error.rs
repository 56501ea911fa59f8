//! Error types for the reservation store

use atelier_common::AtelierError;
use thiserror::Error;

/// Errors that can occur when working with the database client
#[derive(Debug, Error)]
pub enum DbError {
    /// Error from SQLx
    #[error("Database error: {0}")]
    SqlxError(#[from] sqlx::Error),

    /// Error with the database configuration
    #[error("Database configuration error: {0}")]
    ConfigError(String),

    /// Error with database pool creation
    #[error("Database pool error: {0}")]
    PoolError(String),

    /// Error with database query
    #[error("Database query error: {0}")]
    QueryError(String),

    /// A row could not be decoded into the expected shape
    #[error("Database decode error: {0}")]
    DecodeError(String),
}

impl From<DbError> for AtelierError {
    fn from(err: DbError) -> Self {
        AtelierError::StorageError(err.to_string())
    }
}
