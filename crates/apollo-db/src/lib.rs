//! # apollo-db
//!
//! Storage layer implementing the repository traits from `apollo-core`.
//!
//! ## Overview
//!
//! Two interchangeable backends:
//!
//! - PostgreSQL via SQLx, with the schema embedded and applied at start-up
//! - An in-process store (`memory`) backed by `DashMap` and `parking_lot`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use apollo_db::{apply_schema, create_pool, PoolConfig, PgRelationRepository};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&PoolConfig::new("postgres://localhost/apollo")).await?;
//!     apply_schema(&pool).await?;
//!     let relations = PgRelationRepository::new(pool);
//!
//!     // Use the repository...
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod memory;
pub mod models;
pub mod pool;
pub mod repositories;
pub mod schema;

// Re-export commonly used types
pub use memory::{
    MemoryMetaRepository, MemoryPostRepository, MemoryRelationRepository, MemoryStore,
    MemoryUserRepository, MemoryViewStatRepository,
};
pub use pool::{create_pool, PgPool, PoolConfig};
pub use repositories::{
    PgMetaRepository, PgPostRepository, PgRelationRepository, PgUserRepository,
    PgViewStatRepository,
};
pub use schema::apply_schema;
