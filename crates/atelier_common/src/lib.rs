// --- File: crates/atelier_common/src/lib.rs ---

// Declare modules within this crate
pub mod models;      // Data structures shared by the store and the workflow
pub mod error;       // Error handling
pub mod http;        // HTTP utilities
pub mod services;    // Provider capability abstractions
pub mod credentials; // Credential provider abstraction
pub mod oauth;       // Google OAuth implementation of the credential provider
pub mod logging;     // Logging utilities

// Re-export error types and utilities for easier access
pub use error::{
    AtelierError,
    HttpStatusCode,
    config_error,
    validation_error,
    storage_error,
    external_service_error,
    internal_error,
};

// Re-export HTTP utilities for easier access
pub use http::client::{HTTP_CLIENT, create_client};

// Re-export logging utilities for easier access
pub use logging::init_with_filter;

// This crate provides functionality shared by every Atelier crate: the
// reservation model, the error taxonomy, the provider traits and the
// credential plumbing used to call Google on behalf of the operator.
