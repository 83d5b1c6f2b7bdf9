use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info};

use crate::config::DatabaseConfig;

/// Errors from the persistence layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid stored value: {0}")]
    InvalidValue(String),

    #[error("Database unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Owns the bounded connection pool shared by every request.
///
/// Constructed once at startup and handed to the repository; there is no
/// process-wide instance.
#[derive(Debug, Clone)]
pub struct DatabaseManager {
    pool: PgPool,
}

impl DatabaseManager {
    /// Build the pool from configuration. Connections are opened on first use,
    /// so a database that is down at boot does not prevent the server starting.
    pub fn new(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let options = Self::connect_options(config)?;
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect_lazy_with(options);

        info!(
            "Created database pool for {}@{}:{}/{} (max {} connections)",
            config.user, config.host, config.port, config.name, config.max_connections
        );
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    fn connect_options(config: &DatabaseConfig) -> Result<PgConnectOptions, DatabaseError> {
        if config.host.is_empty() {
            return Err(DatabaseError::ConfigMissing("DB_HOST"));
        }
        if config.name.is_empty() {
            return Err(DatabaseError::ConfigMissing("DB_NAME"));
        }

        let mut options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .database(&config.name);
        if !config.password.is_empty() {
            options = options.password(&config.password);
        }
        Ok(options)
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Startup check: logs whether the database is reachable without failing boot
    pub async fn log_connectivity(&self) {
        match self.health_check().await {
            Ok(()) => info!("Connected to the PostgreSQL database"),
            Err(e) => error!("Error connecting to the database: {}", e),
        }
    }

    /// Close the pool (e.g., on shutdown)
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Closed database pool");
    }
}
