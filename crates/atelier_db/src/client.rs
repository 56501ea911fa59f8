//! Database client for the reservation store
//!
//! A thin wrapper around an SQLx `Any` pool built from `database.url`.

use crate::error::DbError;
use atelier_config::DatabaseConfig;
use sqlx::pool::PoolOptions;
use sqlx::Pool;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, error, info};

/// Handle on the reservation database.
#[derive(Debug, Clone)]
pub struct DbClient {
    pool: Pool<sqlx::Any>,
    location: String,
}

impl DbClient {
    /// Opens the database named by `database.url`.
    pub async fn from_config(db_config: &DatabaseConfig) -> Result<Self, DbError> {
        Self::from_url(db_config.url.trim()).await
    }

    /// Opens `db_url`. `sqlite::memory:` yields a private in-memory database
    /// held by a single pooled connection; a SQLite file and its directory
    /// are created when missing.
    pub async fn from_url(db_url: &str) -> Result<Self, DbError> {
        if db_url.is_empty() {
            return Err(DbError::ConfigError("database.url is empty".to_string()));
        }

        let in_memory = db_url.contains(":memory:");
        let location = match sqlite_file_path(db_url) {
            Some(path) if !in_memory => {
                ensure_sqlite_file(path)?;
                format!("sqlite file {}", path)
            }
            _ if in_memory => "sqlite in-memory".to_string(),
            _ => db_url.split("://").next().unwrap_or(db_url).to_string(),
        };

        let pool = open_pool(db_url, in_memory).await?;
        info!("Reservation database ready ({})", location);
        Ok(Self { pool, location })
    }

    pub fn pool(&self) -> &Pool<sqlx::Any> {
        &self.pool
    }

    /// Runs a statement that returns no rows and reports the affected count.
    pub async fn execute(&self, query: &str) -> Result<u64, DbError> {
        sqlx::query(query)
            .execute(&self.pool)
            .await
            .map(|done| done.rows_affected())
            .map_err(|e| DbError::QueryError(e.to_string()))
    }

    pub async fn is_healthy(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

impl std::fmt::Display for DbClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.location)
    }
}

async fn open_pool(db_url: &str, in_memory: bool) -> Result<Pool<sqlx::Any>, DbError> {
    debug!("Opening reservation database at {}", db_url);

    #[cfg(feature = "sqlite")]
    sqlx::any::install_default_drivers();

    // Each connection to `:memory:` opens its own database: keep exactly one
    // alive for the life of the process.
    let options = if in_memory {
        PoolOptions::<sqlx::Any>::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        PoolOptions::<sqlx::Any>::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .idle_timeout(Duration::from_secs(600))
    };

    let connect_options = sqlx::any::AnyConnectOptions::from_str(db_url)?;
    options.connect_with(connect_options).await.map_err(|e| {
        error!("Cannot open reservation database: {}", e);
        DbError::PoolError(e.to_string())
    })
}

/// Extracts the file path from `sqlite:path` or `sqlite://path`, dropping any
/// `?mode=...` query string.
fn sqlite_file_path(db_url: &str) -> Option<&str> {
    let rest = db_url
        .strip_prefix("sqlite://")
        .or_else(|| db_url.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next().unwrap_or(rest);
    if path.is_empty() {
        None
    } else {
        Some(path)
    }
}

/// SQLite refuses to open a missing file through the `Any` driver, so the
/// file and its directory are created up front.
fn ensure_sqlite_file(db_path: &str) -> Result<(), DbError> {
    let path = Path::new(db_path);
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            debug!("mkdir {}", dir.display());
            std::fs::create_dir_all(dir)
                .map_err(|e| DbError::PoolError(format!("{}: {}", dir.display(), e)))?;
        }
    }

    if !path.exists() {
        debug!("Creating {}", db_path);
        std::fs::File::create(path).map_err(|e| DbError::PoolError(format!("{}: {}", db_path, e)))?;
    }

    Ok(())
}
