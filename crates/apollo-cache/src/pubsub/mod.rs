//! Redis Pub/Sub module.
//!
//! Provides publish functionality for distributing domain events.

mod channels;
mod forwarder;
mod publisher;

pub use channels::{PubSubChannel, EVENTS_CHANNEL, LISTING_CHANNEL_PREFIX};
pub use forwarder::RedisEventForwarder;
pub use publisher::{PubSubEvent, Publisher};
