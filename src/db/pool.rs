//! Database connection pool management.

use anyhow::{Context, Result};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tracing::info;

use crate::config::DatabaseConfig;

/// Application database state shared across the application.
#[derive(Debug, Clone)]
pub struct DbPool {
    pub pool: SqlitePool,
}

impl DbPool {
    /// Create a new database connection pool, creating the SQLite file if absent.
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        let conn_str = config.connection_string();
        info!("Connecting to database: {}", config.path);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&conn_str)
            .await
            .with_context(|| format!("Failed to connect to database at {}", conn_str))?;

        info!("Database connection pool established");
        Ok(Self { pool })
    }

    pub fn get_pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Test the database connection.
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .context("Database ping failed")?;
        Ok(())
    }
}
