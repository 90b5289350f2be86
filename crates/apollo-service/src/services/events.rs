//! In-process event bus
//!
//! Delivers each published [`DomainEvent`] to every registered subscriber, in
//! registration order, awaiting each one before the next. A subscriber error
//! or a subscriber that overruns its deadline is logged and never reaches the
//! publisher.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{info, warn};

use apollo_core::{DomainError, DomainEvent, EventSubscriber};

/// Longest a single subscriber may take to handle one event
pub const DEFAULT_HANDLER_TIMEOUT: Duration = Duration::from_secs(3);

pub struct EventBus {
    subscribers: RwLock<Vec<Arc<dyn EventSubscriber>>>,
    handler_timeout: Duration,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::with_handler_timeout(DEFAULT_HANDLER_TIMEOUT)
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_handler_timeout(handler_timeout: Duration) -> Self {
        Self {
            subscribers: RwLock::new(Vec::new()),
            handler_timeout,
        }
    }

    pub fn subscribe(&self, subscriber: Arc<dyn EventSubscriber>) {
        info!(subscriber = subscriber.name(), "Event subscriber registered");
        self.subscribers.write().push(subscriber);
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().len()
    }

    pub async fn publish(&self, event: DomainEvent) {
        // snapshot so the lock is not held across awaits
        let subscribers = self.subscribers.read().clone();

        for subscriber in subscribers {
            match tokio::time::timeout(self.handler_timeout, subscriber.handle(&event)).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!(
                    subscriber = subscriber.name(),
                    event_type = event.event_type(),
                    error = %e,
                    "Event subscriber failed"
                ),
                Err(_) => warn!(
                    subscriber = subscriber.name(),
                    event_type = event.event_type(),
                    timeout_ms = self.handler_timeout.as_millis(),
                    "Event subscriber timed out"
                ),
            }
        }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .field("handler_timeout", &self.handler_timeout)
            .finish()
    }
}

/// Writes every domain event to the log
pub struct AuditLogSubscriber;

#[async_trait]
impl EventSubscriber for AuditLogSubscriber {
    fn name(&self) -> &'static str {
        "audit_log"
    }

    async fn handle(&self, event: &DomainEvent) -> Result<(), DomainError> {
        info!(
            event_type = event.event_type(),
            object_id = event.object_id().map(|id| id.into_inner()),
            at = %event.timestamp(),
            "Domain event"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apollo_core::events::UserRegisteredEvent;
    use apollo_core::EntityId;
    use parking_lot::Mutex;

    struct Recorder {
        name: &'static str,
        log: Arc<Mutex<Vec<String>>>,
        fail: bool,
    }

    #[async_trait]
    impl EventSubscriber for Recorder {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn handle(&self, event: &DomainEvent) -> Result<(), DomainError> {
            self.log
                .lock()
                .push(format!("{}:{}", self.name, event.event_type()));
            if self.fail {
                return Err(DomainError::InternalError("boom".into()));
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_delivery_is_ordered_and_survives_failures() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let bus = EventBus::new();
        bus.subscribe(Arc::new(Recorder { name: "first", log: log.clone(), fail: true }));
        bus.subscribe(Arc::new(Recorder { name: "second", log: log.clone(), fail: false }));

        bus.publish(DomainEvent::UserRegistered(UserRegisteredEvent::new(EntityId::new(1))))
            .await;

        assert_eq!(
            *log.lock(),
            vec!["first:user_registered".to_string(), "second:user_registered".to_string()]
        );
        assert_eq!(bus.subscriber_count(), 2);
    }

    struct Stalled;

    #[async_trait]
    impl EventSubscriber for Stalled {
        fn name(&self) -> &'static str {
            "stalled"
        }

        async fn handle(&self, _event: &DomainEvent) -> Result<(), DomainError> {
            std::future::pending::<()>().await;
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_subscriber_is_cut_off() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let bus = EventBus::with_handler_timeout(Duration::from_millis(50));
        bus.subscribe(Arc::new(Stalled));
        bus.subscribe(Arc::new(Recorder { name: "after", log: log.clone(), fail: false }));

        bus.publish(DomainEvent::UserRegistered(UserRegisteredEvent::new(EntityId::new(1))))
            .await;

        assert_eq!(*log.lock(), vec!["after:user_registered".to_string()]);
    }
}
