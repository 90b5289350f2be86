//! Domain events - events emitted when domain state changes
//!
//! These events are used for:
//! - Forwarding engagement changes to Redis subscribers
//! - Audit logging

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{RelationKind, ViewKind};
use crate::value_objects::EntityId;

/// All possible domain events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    // =========================================================================
    // Engagement Events
    // =========================================================================
    RelationAdded(RelationChangedEvent),
    RelationRemoved(RelationChangedEvent),
    ViewRecorded(ViewRecordedEvent),
    CountersReconciled(CountersReconciledEvent),

    // =========================================================================
    // Listing Events
    // =========================================================================
    PostCreated(PostEvent),
    PostUpdated(PostEvent),
    PostDeleted(PostEvent),
    MetaUpdated(MetaUpdatedEvent),

    // =========================================================================
    // Account Events
    // =========================================================================
    UserRegistered(UserRegisteredEvent),
}

impl DomainEvent {
    /// Get the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::RelationAdded(_) => "relation_added",
            Self::RelationRemoved(_) => "relation_removed",
            Self::ViewRecorded(_) => "view_recorded",
            Self::CountersReconciled(_) => "counters_reconciled",
            Self::PostCreated(_) => "post_created",
            Self::PostUpdated(_) => "post_updated",
            Self::PostDeleted(_) => "post_deleted",
            Self::MetaUpdated(_) => "meta_updated",
            Self::UserRegistered(_) => "user_registered",
        }
    }

    /// Get the timestamp of the event
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::RelationAdded(e) | Self::RelationRemoved(e) => e.timestamp,
            Self::ViewRecorded(e) => e.timestamp,
            Self::CountersReconciled(e) => e.timestamp,
            Self::PostCreated(e) | Self::PostUpdated(e) | Self::PostDeleted(e) => e.timestamp,
            Self::MetaUpdated(e) => e.timestamp,
            Self::UserRegistered(e) => e.timestamp,
        }
    }

    /// The event listing this event concerns, if any
    pub fn object_id(&self) -> Option<EntityId> {
        match self {
            Self::RelationAdded(e) | Self::RelationRemoved(e) => Some(e.object_id),
            Self::ViewRecorded(e) => Some(e.object_id),
            Self::PostCreated(e) | Self::PostUpdated(e) | Self::PostDeleted(e) => Some(e.post_id),
            Self::MetaUpdated(e) => Some(e.post_id),
            Self::CountersReconciled(_) | Self::UserRegistered(_) => None,
        }
    }
}

// ============================================================================
// Event Structs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationChangedEvent {
    pub kind: RelationKind,
    pub subject_id: EntityId,
    pub object_id: EntityId,
    /// Counter value after the change
    pub count: i64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewRecordedEvent {
    pub object_id: EntityId,
    pub kind: ViewKind,
    pub total_count: i64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountersReconciledEvent {
    pub events_scanned: usize,
    pub counters_changed: usize,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostEvent {
    pub post_id: EntityId,
    pub actor_id: EntityId,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaUpdatedEvent {
    pub post_id: EntityId,
    pub keys: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRegisteredEvent {
    pub user_id: EntityId,
    pub timestamp: DateTime<Utc>,
}

// ============================================================================
// Event Creation Helpers
// ============================================================================

impl RelationChangedEvent {
    pub fn new(kind: RelationKind, subject_id: EntityId, object_id: EntityId, count: i64) -> Self {
        Self {
            kind,
            subject_id,
            object_id,
            count,
            timestamp: Utc::now(),
        }
    }
}

impl ViewRecordedEvent {
    pub fn new(object_id: EntityId, kind: ViewKind, total_count: i64) -> Self {
        Self {
            object_id,
            kind,
            total_count,
            timestamp: Utc::now(),
        }
    }
}

impl CountersReconciledEvent {
    pub fn new(events_scanned: usize, counters_changed: usize) -> Self {
        Self {
            events_scanned,
            counters_changed,
            timestamp: Utc::now(),
        }
    }
}

impl PostEvent {
    pub fn new(post_id: EntityId, actor_id: EntityId) -> Self {
        Self {
            post_id,
            actor_id,
            timestamp: Utc::now(),
        }
    }
}

impl MetaUpdatedEvent {
    pub fn new(post_id: EntityId, keys: Vec<String>) -> Self {
        Self {
            post_id,
            keys,
            timestamp: Utc::now(),
        }
    }
}

impl UserRegisteredEvent {
    pub fn new(user_id: EntityId) -> Self {
        Self {
            user_id,
            timestamp: Utc::now(),
        }
    }
}
