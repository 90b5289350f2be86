//! Repository traits (ports) - define the interface for data access
//!
//! These traits follow the Repository pattern from Domain-Driven Design.
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation (PostgreSQL or the in-process store).

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::entities::{
    EngagementRelation, NewPost, NewUser, Post, PostStatus, PostType, RelationKind,
    StatsSnapshot, User, ViewKind, ViewStat,
};
use crate::error::DomainError;
use crate::value_objects::{EntityId, MetaKey};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: EntityId) -> RepoResult<Option<User>>;

    /// Find user by login name
    async fn find_by_login(&self, login: &str) -> RepoResult<Option<User>>;

    /// Find user by email (case-insensitive)
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;

    /// Number of registered accounts
    async fn count(&self) -> RepoResult<i64>;

    /// Create a new user; duplicate login or email is a `Conflict`
    async fn create(&self, user: &NewUser, password_hash: &str) -> RepoResult<User>;

    /// Create a self-registered account
    ///
    /// `user.role` is ignored. The account becomes `Administrator` when no other
    /// account exists and `Subscriber` otherwise, decided atomically with the
    /// insert so concurrent first registrations yield one administrator.
    async fn register(&self, user: &NewUser, password_hash: &str) -> RepoResult<User>;

    /// Get password hash for authentication
    async fn get_password_hash(&self, id: EntityId) -> RepoResult<Option<String>>;
}

// ============================================================================
// Post Repository
// ============================================================================

/// Filter and pagination for post listings
#[derive(Debug, Clone)]
pub struct PostQuery {
    pub post_type: Option<PostType>,
    pub status: Option<PostStatus>,
    pub limit: i64,
    pub offset: i64,
}

impl Default for PostQuery {
    fn default() -> Self {
        Self {
            post_type: Some(PostType::EventListing),
            status: Some(PostStatus::Publish),
            limit: 20,
            offset: 0,
        }
    }
}

#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Find post by ID
    async fn find_by_id(&self, id: EntityId) -> RepoResult<Option<Post>>;

    /// List posts, newest first
    async fn list(&self, query: &PostQuery) -> RepoResult<Vec<Post>>;

    /// IDs of every post of a type, any status
    async fn ids_by_type(&self, post_type: PostType) -> RepoResult<Vec<EntityId>>;

    /// Create a new post
    async fn create(&self, post: &NewPost) -> RepoResult<Post>;

    /// Update title, content, status and updated_at
    async fn update(&self, post: &Post) -> RepoResult<()>;

    /// Delete a post together with its meta, relations and view stats
    ///
    /// Returns false if no post was deleted.
    async fn delete(&self, id: EntityId) -> RepoResult<bool>;
}

// ============================================================================
// Meta Repository
// ============================================================================

/// Key-value storage namespaced by (post_id, key); values are raw strings
#[async_trait]
pub trait MetaRepository: Send + Sync {
    async fn get(&self, post_id: EntityId, key: MetaKey) -> RepoResult<Option<String>>;

    /// All stored keys for a post, in allow-list order
    async fn get_all(&self, post_id: EntityId) -> RepoResult<Vec<(MetaKey, String)>>;

    /// Insert or replace a value
    async fn set(&self, post_id: EntityId, key: MetaKey, value: &str) -> RepoResult<()>;

    /// Returns false if the key was not set
    async fn delete(&self, post_id: EntityId, key: MetaKey) -> RepoResult<bool>;
}

// ============================================================================
// Relation Repository
// ============================================================================

/// Result of inserting a relation row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// The (kind, subject, object) row was already present
    AlreadyExists,
}

#[async_trait]
pub trait RelationRepository: Send + Sync {
    /// Insert a relation; uniqueness is enforced atomically by the store
    async fn insert(&self, relation: &EngagementRelation) -> RepoResult<InsertOutcome>;

    /// Returns false if no row was removed
    async fn delete(
        &self,
        kind: RelationKind,
        subject_id: EntityId,
        object_id: EntityId,
    ) -> RepoResult<bool>;

    async fn exists(
        &self,
        kind: RelationKind,
        subject_id: EntityId,
        object_id: EntityId,
    ) -> RepoResult<bool>;

    /// Full count of relations of a kind for an object
    async fn count_by_object(&self, kind: RelationKind, object_id: EntityId) -> RepoResult<i64>;

    /// Objects a subject is related to, newest first
    async fn list_by_subject(
        &self,
        kind: RelationKind,
        subject_id: EntityId,
    ) -> RepoResult<Vec<EntityId>>;
}

// ============================================================================
// View Stat Repository
// ============================================================================

#[async_trait]
pub trait ViewStatRepository: Send + Sync {
    /// Count one view and apply the daily-series retention atomically
    async fn record(
        &self,
        object_id: EntityId,
        kind: ViewKind,
        date: NaiveDate,
        at: DateTime<Utc>,
    ) -> RepoResult<ViewStat>;

    /// Stats for an object, None if it was never viewed
    async fn find(&self, object_id: EntityId) -> RepoResult<Option<ViewStat>>;

    /// Most viewed objects by total count, descending
    async fn top(&self, limit: i64) -> RepoResult<Vec<(EntityId, StatsSnapshot)>>;
}
