//! # apollo-core
//!
//! Domain layer containing entities, value objects, repository traits, and domain events
//! for event listings and the engagement counters built on top of them.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod events;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    DailyViews, EngagementRelation, NewPost, NewUser, Post, PostStatus, PostType, RelationKind, Role,
    StatsSnapshot, ToggleOutcome, ToggleState, User, ViewKind, ViewStat, MAX_DAILY_BUCKETS,
};
pub use error::DomainError;
pub use events::DomainEvent;
pub use traits::{
    EventSubscriber, InsertOutcome, MetaRepository, PostQuery, PostRepository, RelationRepository,
    RepoResult, UserRepository, ViewStatRepository,
};
pub use value_objects::{
    Capabilities, EntityId, EntityIdParseError, MetaKey, MetaKind, MetaValue, MAX_TEXT_LENGTH,
};
