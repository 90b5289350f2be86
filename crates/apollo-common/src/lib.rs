//! # apollo-common
//!
//! Shared utilities including configuration, error handling, sessions, nonces and telemetry.

pub mod auth;
pub mod config;
pub mod error;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use auth::{
    hash_password, verify_password, Claims, JwtService, NonceAction, PasswordPolicy,
    PasswordService, SessionToken, TokenType,
};
pub use config::{
    AppConfig, AppSettings, ConfigError, CorsConfig, DatabaseConfig, Environment,
    RateLimitConfig, RedisConfig, ServerConfig, SessionConfig, SiteConfig, StorageBackend,
};
pub use error::{AppError, AppResult, ErrorResponse};
pub use telemetry::{try_init_tracing, TracingConfig, TracingError};
