//! Pub/Sub channel definitions.
//!
//! Defines the channel naming conventions for Redis Pub/Sub.

use apollo_core::EntityId;

/// Channel carrying every domain event
pub const EVENTS_CHANNEL: &str = "apollo:events";
/// Channel prefix for events concerning one event listing
pub const LISTING_CHANNEL_PREFIX: &str = "apollo:event:";

/// Pub/Sub channel types
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PubSubChannel {
    /// All domain events
    Events,
    /// Events for a single event listing
    Listing(EntityId),
    /// Custom channel name
    Custom(String),
}

impl PubSubChannel {
    /// Create a listing channel
    #[must_use]
    pub fn listing(post_id: EntityId) -> Self {
        Self::Listing(post_id)
    }

    /// Create a custom channel
    #[must_use]
    pub fn custom(name: impl Into<String>) -> Self {
        Self::Custom(name.into())
    }

    /// Get the Redis channel name
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Events => EVENTS_CHANNEL.to_string(),
            Self::Listing(id) => format!("{LISTING_CHANNEL_PREFIX}{id}"),
            Self::Custom(name) => name.clone(),
        }
    }

    /// Parse a channel name back to a `PubSubChannel`
    #[must_use]
    pub fn parse(name: &str) -> Self {
        if name == EVENTS_CHANNEL {
            return Self::Events;
        }

        if let Some(id_str) = name.strip_prefix(LISTING_CHANNEL_PREFIX) {
            if let Ok(id) = EntityId::parse(id_str) {
                return Self::Listing(id);
            }
        }

        Self::Custom(name.to_string())
    }
}

impl std::fmt::Display for PubSubChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
