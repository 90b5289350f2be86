//! # apollo-cache
//!
//! Redis layer for fanning domain events out to other processes.
//!
//! ## Features
//!
//! - **Connection Pool**: Managed Redis connection pool with deadpool
//! - **Pub/Sub**: Domain events published to `apollo:events` and per-listing channels
//!
//! ## Example
//!
//! ```ignore
//! use apollo_cache::{Publisher, RedisEventForwarder, RedisPool, RedisPoolConfig};
//!
//! let pool = RedisPool::new(RedisPoolConfig::new("redis://127.0.0.1:6379"))?;
//! let forwarder = RedisEventForwarder::new(Publisher::new(pool));
//!
//! // Register with the service event bus
//! event_bus.subscribe(Arc::new(forwarder));
//! ```

pub mod pool;
pub mod pubsub;

// Re-export pool types
pub use pool::{RedisPool, RedisPoolConfig, RedisPoolError, RedisResult, SharedRedisPool};

// Re-export pubsub types
pub use pubsub::{
    PubSubChannel, PubSubEvent, Publisher, RedisEventForwarder, EVENTS_CHANNEL,
    LISTING_CHANNEL_PREFIX,
};
