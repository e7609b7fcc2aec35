//! Connection manager: the process-wide lazily-created database handle.
//!
//! All request handlers share the one cached pool; only this component
//! may create, replace, or destroy it.

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::config::Config;
use crate::db::schema::SQLITE_INIT;
use crate::db::sqlite::SqlitePool;
use crate::error::CafeError;

pub struct ConnectionManager {
    config: Config,
    // Async mutex so concurrent first requests serialize on one attempt.
    pool: Mutex<Option<SqlitePool>>,
}

impl ConnectionManager {
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
            pool: Mutex::new(None),
        }
    }

    /// Return the cached pool, establishing it on first demand.
    ///
    /// Idempotent: a cached pool is returned without a new connection
    /// attempt. Atomic: a failed attempt caches nothing, so a later call
    /// starts from scratch.
    pub async fn connect(&self) -> Result<SqlitePool, CafeError> {
        let mut guard = self.pool.lock().await;
        if let Some(pool) = guard.as_ref() {
            debug!("reusing cached database handle");
            return Ok(pool.clone());
        }

        let url = self.config.storage_url()?;
        let options = SqliteConnectOptions::from_str(&url)
            .map_err(|e| CafeError::Configuration(format!("invalid connection string: {e}")))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(self.config.max_connections)
            .acquire_timeout(Duration::from_secs(self.config.acquire_timeout_secs))
            .idle_timeout(Duration::from_secs(self.config.idle_timeout_secs))
            .connect_with(options)
            .await
            .map_err(|e| CafeError::Connectivity(e.to_string()))?;

        // Liveness check before the handle becomes visible to anyone.
        if let Err(e) = sqlx::query("SELECT 1").execute(&pool).await {
            pool.close().await;
            return Err(CafeError::Connectivity(e.to_string()));
        }

        if let Err(e) = init_schema(&pool).await {
            pool.close().await;
            return Err(e);
        }

        info!(url = %url, "database handle established");
        *guard = Some(pool.clone());
        Ok(pool)
    }

    /// The cached pool, or `NotInitialized` if `connect()` has not
    /// completed successfully.
    pub async fn handle(&self) -> Result<SqlitePool, CafeError> {
        self.pool
            .lock()
            .await
            .as_ref()
            .cloned()
            .ok_or(CafeError::NotInitialized)
    }

    /// Non-connecting peek for the health route.
    pub async fn is_connected(&self) -> bool {
        self.pool.lock().await.is_some()
    }

    /// Release the underlying connection and clear the cache.
    /// Safe to call when no connection exists.
    pub async fn close(&self) {
        if let Some(pool) = self.pool.lock().await.take() {
            pool.close().await;
            info!("database handle closed");
        }
    }
}

/// Execute the bundled DDL statement by statement (sqlx::query does not
/// accept multi-command strings).
async fn init_schema(pool: &SqlitePool) -> Result<(), CafeError> {
    for stmt in SQLITE_INIT.split(';') {
        let s = stmt.trim();
        if s.is_empty() {
            continue;
        }
        sqlx::query(s).execute(pool).await?;
    }
    Ok(())
}
