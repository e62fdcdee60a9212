//! FreePBX CDR database access for the IVR statistics browser

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod models;
pub mod queries;

pub use queries::{CallLogQueries, LocationQueries};

use async_trait::async_trait;
use ivrstats_core::{CallLogSource, CallRecord, Config, Error, Result};
use sqlx::mysql::MySqlPoolOptions;

// Re-export MySqlPool for convenience
pub use sqlx::MySqlPool;
use std::time::Duration;

/// Connection to the FreePBX database
#[derive(Debug, Clone)]
pub struct Database {
    pool: MySqlPool,
    excluded_location_marker: String,
}

impl Database {
    /// Open the connection pool
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection cannot be established.
    pub async fn new(config: &Config) -> Result<Self> {
        let pool = MySqlPoolOptions::new()
            .max_connections(config.database.max_connections)
            .acquire_timeout(Duration::from_secs(config.database.connect_timeout))
            .idle_timeout(Duration::from_secs(config.database.idle_timeout))
            .connect(&config.database.url)
            .await
            .map_err(|e| Error::Database(e.to_string()))?;

        tracing::info!(
            max_connections = config.database.max_connections,
            "Connected to database"
        );

        Ok(Self::with_pool(
            pool,
            config.query.excluded_location_marker.clone(),
        ))
    }

    /// Wrap an existing pool
    #[must_use]
    pub fn with_pool<S: Into<String>>(pool: MySqlPool, excluded_location_marker: S) -> Self {
        Self {
            pool,
            excluded_location_marker: excluded_location_marker.into(),
        }
    }

    /// Get a reference to the connection pool
    #[must_use]
    pub const fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// Health check
    ///
    /// # Errors
    ///
    /// Returns an error if the health check fails.
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| Error::Database(format!("Health check failed: {e}")))?;

        Ok(())
    }

    /// Close every connection, waiting for them to be released
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Database connection closed");
    }
}

#[async_trait]
impl CallLogSource for Database {
    async fn fetch_locations(&self) -> Result<Vec<String>> {
        LocationQueries::fetch_known(&self.pool, &self.excluded_location_marker).await
    }

    async fn fetch_call_log(&self) -> Result<Vec<CallRecord>> {
        CallLogQueries::fetch_all(&self.pool).await
    }
}
