//! Reservation store for the Atelier booking backend
//!
//! This crate owns the `reservations` table. It talks to the database through
//! SQLx's `Any` driver; SQLite is the default backend.
//!
//! # Example
//!
//! ```rust,no_run
//! use atelier_config::DatabaseConfig;
//! use atelier_db::{DbClient, ReservationRepository, SqlReservationRepository};
//!
//! async fn setup_store() -> Result<SqlReservationRepository, Box<dyn std::error::Error>> {
//!     let db_client = DbClient::from_config(&DatabaseConfig::default()).await?;
//!     let repository = SqlReservationRepository::new(db_client);
//!     repository.init_schema().await?;
//!     Ok(repository)
//! }
//! ```

pub mod client;
pub mod error;
pub mod repositories;

// Register the SQLite driver when the crate is loaded
#[cfg(feature = "sqlite")]
mod sqlite_driver {
    #[allow(unused_imports)]
    use sqlx::sqlite::SqlitePoolOptions as _;
}

pub use client::DbClient;
pub use error::DbError;
pub use repositories::{ReservationRepository, SqlReservationRepository};
