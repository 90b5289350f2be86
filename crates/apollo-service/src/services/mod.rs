//! Business logic services
//!
//! This module contains all service layer implementations that handle
//! business logic, validation, and orchestration of domain operations.

pub mod access;
pub mod auth;
pub mod clock;
pub mod context;
pub mod engagement;
pub mod error;
pub mod events;
pub mod health;
pub mod locks;
pub mod meta;
pub mod post;
pub mod view_tracking;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export all services for convenience
pub use access::{can_view, require_capability};
pub use auth::AuthService;
pub use clock::SiteClock;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use engagement::EngagementService;
pub use error::{validation_message, ServiceError, ServiceResult};
pub use events::{AuditLogSubscriber, EventBus};
pub use health::HealthService;
pub use locks::CounterLocks;
pub use meta::MetaService;
pub use post::PostService;
pub use view_tracking::ViewTrackingService;
