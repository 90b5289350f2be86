//! Event bus subscriber that forwards domain events to Redis

use async_trait::async_trait;

use apollo_core::{DomainError, DomainEvent, EventSubscriber};

use super::Publisher;

/// Forwards every published domain event to Redis Pub/Sub
///
/// Delivery is best-effort: a failed publish is reported to the event bus,
/// which logs it without failing the originating request.
#[derive(Clone)]
pub struct RedisEventForwarder {
    publisher: Publisher,
}

impl RedisEventForwarder {
    #[must_use]
    pub fn new(publisher: Publisher) -> Self {
        Self { publisher }
    }
}

#[async_trait]
impl EventSubscriber for RedisEventForwarder {
    fn name(&self) -> &'static str {
        "redis_forwarder"
    }

    async fn handle(&self, event: &DomainEvent) -> Result<(), DomainError> {
        self.publisher
            .publish_domain_event(event)
            .await
            .map(|_| ())
            .map_err(|e| DomainError::InternalError(format!("redis publish failed: {e}")))
    }
}
