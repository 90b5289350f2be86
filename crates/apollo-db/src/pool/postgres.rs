//! PostgreSQL connection pool management

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

/// Settings for the connection pool
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// PostgreSQL connection URL
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of connections to maintain
    pub min_connections: u32,
    /// Maximum time to wait for a connection
    pub acquire_timeout: Duration,
    /// Maximum idle time before a connection is closed
    pub idle_timeout: Duration,
    /// Maximum lifetime of a connection
    pub max_lifetime: Duration,
}

impl PoolConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 10,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(10),
            idle_timeout: Duration::from_secs(300),
            max_lifetime: Duration::from_secs(1800),
        }
    }

    /// Build from the application database settings
    ///
    /// Returns None when no URL is configured.
    pub fn from_app(config: &apollo_common::DatabaseConfig) -> Option<Self> {
        config.url.as_ref().map(|url| Self {
            max_connections: config.max_connections,
            min_connections: config.min_connections,
            ..Self::new(url.clone())
        })
    }
}

/// Create a new PostgreSQL connection pool
pub async fn create_pool(config: &PoolConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout)
        .idle_timeout(config.idle_timeout)
        .max_lifetime(config.max_lifetime)
        .connect(&config.url)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_config() {
        let config = PoolConfig::new("postgres://localhost/apollo");
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 1);
        assert_eq!(config.acquire_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_from_app() {
        let mut app = apollo_common::AppConfig::in_memory("s").database;
        assert!(PoolConfig::from_app(&app).is_none());

        app.url = Some("postgres://localhost/apollo".to_string());
        app.max_connections = 3;
        let config = PoolConfig::from_app(&app).unwrap();
        assert_eq!(config.url, "postgres://localhost/apollo");
        assert_eq!(config.max_connections, 3);
    }
}
