//! Redis Pub/Sub publisher.
//!
//! Publishes domain events to Redis channels for other processes to consume.

use crate::pool::{RedisPool, RedisResult};
use crate::pubsub::PubSubChannel;
use apollo_core::DomainEvent;
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};

/// Event wrapper for Pub/Sub messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PubSubEvent {
    /// Event type name (e.g., "relation_added", "view_recorded")
    pub event_type: String,
    /// Event payload
    pub data: serde_json::Value,
}

impl PubSubEvent {
    /// Create a new event
    #[must_use]
    pub fn new(event_type: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            event_type: event_type.into(),
            data,
        }
    }

    /// Wrap a domain event
    pub fn from_domain(event: &DomainEvent) -> Result<Self, serde_json::Error> {
        Ok(Self::new(event.event_type(), serde_json::to_value(event)?))
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Redis Pub/Sub publisher
#[derive(Clone)]
pub struct Publisher {
    pool: RedisPool,
}

impl Publisher {
    /// Create a new publisher
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    /// Publish an event to a channel
    pub async fn publish(&self, channel: &PubSubChannel, event: &PubSubEvent) -> RedisResult<u32> {
        let mut conn = self.pool.get().await?;
        let channel_name = channel.name();
        let payload = event.to_json()?;

        let receivers: u32 = conn.publish(&channel_name, &payload).await?;

        tracing::debug!(
            channel = %channel_name,
            event_type = %event.event_type,
            receivers = receivers,
            "Published event"
        );

        Ok(receivers)
    }

    /// Publish to multiple channels
    pub async fn publish_many(
        &self,
        channels: &[PubSubChannel],
        event: &PubSubEvent,
    ) -> RedisResult<u32> {
        let payload = event.to_json()?;
        let mut total_receivers = 0;
        let mut conn = self.pool.get().await?;

        for channel in channels {
            let channel_name = channel.name();
            let receivers: u32 = conn.publish(&channel_name, &payload).await?;
            total_receivers += receivers;
        }

        tracing::debug!(
            channels = channels.len(),
            event_type = %event.event_type,
            total_receivers = total_receivers,
            "Published event to multiple channels"
        );

        Ok(total_receivers)
    }

    /// Publish a domain event to the global channel and, if it concerns a
    /// listing, to that listing's channel
    pub async fn publish_domain_event(&self, event: &DomainEvent) -> RedisResult<u32> {
        let wrapped = PubSubEvent::from_domain(event)?;
        self.publish_many(&channels_for(event), &wrapped).await
    }
}

/// Channels a domain event is delivered to
pub(crate) fn channels_for(event: &DomainEvent) -> Vec<PubSubChannel> {
    let mut channels = vec![PubSubChannel::Events];
    if let Some(post_id) = event.object_id() {
        channels.push(PubSubChannel::listing(post_id));
    }
    channels
}
