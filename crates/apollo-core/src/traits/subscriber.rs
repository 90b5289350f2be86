//! Event subscriber port

use async_trait::async_trait;

use crate::error::DomainError;
use crate::events::DomainEvent;

/// Receives domain events published after a state change
///
/// Delivery is best-effort: an error is logged by the publisher and never
/// propagates back to the operation that emitted the event.
#[async_trait]
pub trait EventSubscriber: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &'static str;

    async fn handle(&self, event: &DomainEvent) -> Result<(), DomainError>;
}
