//! Shared state behind the in-process repositories

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use parking_lot::RwLock;

use apollo_core::entities::{Post, RelationKind, User, ViewStat};
use apollo_core::value_objects::{EntityId, MetaKey};

#[derive(Debug, Clone)]
pub(crate) struct UserRecord {
    pub user: User,
    pub password_hash: String,
}

pub(crate) type RelationKey = (RelationKind, EntityId, EntityId);

/// Tables of the in-process backend
///
/// Wrap in an `Arc` and hand the same instance to every repository.
#[derive(Debug)]
pub struct MemoryStore {
    next_user_id: AtomicI64,
    next_post_id: AtomicI64,
    pub(crate) users: RwLock<BTreeMap<EntityId, UserRecord>>,
    pub(crate) posts: RwLock<BTreeMap<EntityId, Post>>,
    pub(crate) meta: DashMap<(EntityId, MetaKey), String>,
    pub(crate) relations: DashMap<RelationKey, DateTime<Utc>>,
    pub(crate) views: DashMap<EntityId, ViewStat>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            next_user_id: AtomicI64::new(1),
            next_post_id: AtomicI64::new(1),
            users: RwLock::new(BTreeMap::new()),
            posts: RwLock::new(BTreeMap::new()),
            meta: DashMap::new(),
            relations: DashMap::new(),
            views: DashMap::new(),
        }
    }

    pub(crate) fn next_user_id(&self) -> EntityId {
        EntityId::new(self.next_user_id.fetch_add(1, Ordering::Relaxed))
    }

    pub(crate) fn next_post_id(&self) -> EntityId {
        EntityId::new(self.next_post_id.fetch_add(1, Ordering::Relaxed))
    }

    pub(crate) fn user_exists(&self, id: EntityId) -> bool {
        self.users.read().contains_key(&id)
    }

    pub(crate) fn post_exists(&self, id: EntityId) -> bool {
        self.posts.read().contains_key(&id)
    }

    /// Drop everything hanging off a deleted post
    pub(crate) fn cascade_post(&self, id: EntityId) {
        self.meta.retain(|(post_id, _), _| *post_id != id);
        self.relations.retain(|(_, _, object_id), _| *object_id != id);
        self.views.remove(&id);
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}
