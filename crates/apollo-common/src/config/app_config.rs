//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file if present).

use serde::Deserialize;
use std::env;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub database: DatabaseConfig,
    /// Redis is optional; without it domain events stay in-process
    pub redis: Option<RedisConfig>,
    pub session: SessionConfig,
    pub site: SiteConfig,
    pub rate_limit: RateLimitConfig,
    pub cors: CorsConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Which store backs the repositories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Postgres,
    Memory,
}

impl StorageBackend {
    fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "postgres" | "postgresql" => Some(Self::Postgres),
            "memory" => Some(Self::Memory),
            _ => None,
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    /// Required when `backend` is postgres
    pub url: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Redis configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    pub url: String,
    #[serde(default = "default_redis_max_connections")]
    pub max_connections: u32,
}

/// Session and nonce token configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub secret: String,
    /// Session lifetime in seconds
    #[serde(default = "default_session_expiry")]
    pub session_expiry: i64,
    /// Nonce lifetime in seconds
    #[serde(default = "default_nonce_expiry")]
    pub nonce_expiry: i64,
}

/// Site-wide settings
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Fixed UTC offset of the site time zone, used to pick "today" for view stats
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

/// Rate limiting configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
    #[serde(default = "default_burst")]
    pub burst: u32,
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

// Default value functions
fn default_app_name() -> String {
    "apollo-events".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_redis_max_connections() -> u32 {
    10
}

fn default_session_expiry() -> i64 {
    172_800 // 48 hours
}

fn default_nonce_expiry() -> i64 {
    43_200 // 12 hours
}

fn default_requests_per_second() -> u32 {
    10
}

fn default_burst() -> u32 {
    50
}

/// Largest accepted site offset, matching real-world zones (UTC-12..UTC+14)
const MAX_OFFSET_MINUTES: i32 = 14 * 60;

fn parse_var<T: std::str::FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue(name, raw)),
        Err(_) => Ok(None),
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or malformed
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let backend = match env::var("DATABASE_BACKEND") {
            Ok(raw) => StorageBackend::parse(&raw)
                .ok_or(ConfigError::InvalidValue("DATABASE_BACKEND", raw))?,
            Err(_) => StorageBackend::default(),
        };

        let database_url = env::var("DATABASE_URL").ok();
        if backend == StorageBackend::Postgres && database_url.is_none() {
            return Err(ConfigError::MissingVar("DATABASE_URL"));
        }

        let utc_offset_minutes = parse_var::<i32>("SITE_UTC_OFFSET_MINUTES")?.unwrap_or(0);
        if utc_offset_minutes.abs() > MAX_OFFSET_MINUTES {
            return Err(ConfigError::InvalidValue(
                "SITE_UTC_OFFSET_MINUTES",
                utc_offset_minutes.to_string(),
            ));
        }

        Ok(Self {
            app: AppSettings {
                name: env::var("APP_NAME").unwrap_or_else(|_| default_app_name()),
                env: env::var("APP_ENV")
                    .ok()
                    .and_then(|s| match s.to_lowercase().as_str() {
                        "production" => Some(Environment::Production),
                        "staging" => Some(Environment::Staging),
                        "development" => Some(Environment::Development),
                        _ => None,
                    })
                    .unwrap_or_default(),
            },
            api: ServerConfig {
                host: env::var("API_HOST").unwrap_or_else(|_| default_host()),
                port: parse_var("API_PORT")?.unwrap_or_else(default_port),
            },
            database: DatabaseConfig {
                backend,
                url: database_url,
                max_connections: parse_var("DATABASE_MAX_CONNECTIONS")?
                    .unwrap_or_else(default_max_connections),
                min_connections: parse_var("DATABASE_MIN_CONNECTIONS")?
                    .unwrap_or_else(default_min_connections),
            },
            redis: match env::var("REDIS_URL") {
                Ok(url) if !url.trim().is_empty() => Some(RedisConfig {
                    url,
                    max_connections: parse_var("REDIS_MAX_CONNECTIONS")?
                        .unwrap_or_else(default_redis_max_connections),
                }),
                _ => None,
            },
            session: SessionConfig {
                secret: env::var("SESSION_SECRET")
                    .map_err(|_| ConfigError::MissingVar("SESSION_SECRET"))?,
                session_expiry: parse_var("SESSION_EXPIRY")?.unwrap_or_else(default_session_expiry),
                nonce_expiry: parse_var("NONCE_EXPIRY")?.unwrap_or_else(default_nonce_expiry),
            },
            site: SiteConfig { utc_offset_minutes },
            rate_limit: RateLimitConfig {
                requests_per_second: parse_var("RATE_LIMIT_REQUESTS_PER_SECOND")?
                    .unwrap_or_else(default_requests_per_second),
                burst: parse_var("RATE_LIMIT_BURST")?.unwrap_or_else(default_burst),
            },
            cors: CorsConfig {
                allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                    .ok()
                    .map(|s| s.split(',').map(str::trim).map(String::from).collect())
                    .unwrap_or_default(),
            },
        })
    }

    /// Configuration for the in-process store with no external services
    ///
    /// Used by local development and the integration tests.
    #[must_use]
    pub fn in_memory(secret: impl Into<String>) -> Self {
        Self {
            app: AppSettings {
                name: default_app_name(),
                env: Environment::Development,
            },
            api: ServerConfig {
                host: default_host(),
                port: 0,
            },
            database: DatabaseConfig {
                backend: StorageBackend::Memory,
                url: None,
                max_connections: default_max_connections(),
                min_connections: default_min_connections(),
            },
            redis: None,
            session: SessionConfig {
                secret: secret.into(),
                session_expiry: default_session_expiry(),
                nonce_expiry: default_nonce_expiry(),
            },
            site: SiteConfig {
                utc_offset_minutes: 0,
            },
            rate_limit: RateLimitConfig {
                requests_per_second: default_requests_per_second(),
                burst: default_burst(),
            },
            cors: CorsConfig {
                allowed_origins: Vec::new(),
            },
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_is_production() {
        assert!(!Environment::Development.is_production());
        assert!(!Environment::Staging.is_production());
        assert!(Environment::Production.is_production());
    }

    #[test]
    fn test_server_address() {
        let config = ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 8080,
        };
        assert_eq!(config.address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_backend_parse() {
        assert_eq!(StorageBackend::parse("Postgres"), Some(StorageBackend::Postgres));
        assert_eq!(StorageBackend::parse("memory"), Some(StorageBackend::Memory));
        assert_eq!(StorageBackend::parse("sqlite"), None);
    }

    #[test]
    fn test_in_memory_config() {
        let config = AppConfig::in_memory("secret");
        assert_eq!(config.database.backend, StorageBackend::Memory);
        assert!(config.database.url.is_none());
        assert!(config.redis.is_none());
        assert_eq!(config.session.secret, "secret");
    }

    #[test]
    fn test_default_values() {
        assert_eq!(default_app_name(), "apollo-events");
        assert_eq!(default_host(), "127.0.0.1");
        assert_eq!(default_session_expiry(), 48 * 3600);
        assert_eq!(default_nonce_expiry(), 12 * 3600);
    }
}
