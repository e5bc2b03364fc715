//! Environment-based configuration.

use crate::error::{BoardError, BoardResult};
use crate::pool::create_pool_with_config;
use deadpool_postgres::Pool;

/// Default maximum pool size when `POOL_SIZE` is unset.
pub const DEFAULT_POOL_SIZE: usize = 16;

/// Runtime configuration, loaded from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection URL (`DATABASE_URL`).
    pub database_url: String,
    /// Maximum connection pool size (`POOL_SIZE`).
    pub pool_size: usize,
}

impl Config {
    /// Load configuration from the environment, reading a `.env` file first
    /// when one is present.
    pub fn from_env() -> BoardResult<Self> {
        let _ = dotenvy::dotenv();

        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| BoardError::Connection("DATABASE_URL is not set".to_string()))?;

        let pool_size = match std::env::var("POOL_SIZE") {
            Ok(raw) => raw.parse().map_err(|_| {
                BoardError::validation(format!(
                    "POOL_SIZE must be a positive integer, got '{raw}'"
                ))
            })?,
            Err(_) => DEFAULT_POOL_SIZE,
        };

        Ok(Self {
            database_url,
            pool_size,
        })
    }

    /// Build a connection pool from this configuration.
    pub fn pool(&self) -> BoardResult<Pool> {
        create_pool_with_config(&self.database_url, self.pool_size)
    }
}
