//! In-process implementation of RelationRepository

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use tracing::instrument;

use apollo_core::entities::{EngagementRelation, RelationKind};
use apollo_core::error::DomainError;
use apollo_core::traits::{InsertOutcome, RelationRepository, RepoResult};
use apollo_core::value_objects::EntityId;

use super::store::MemoryStore;

/// Relations keyed by (kind, subject, object)
///
/// The map entry holds its shard lock across check-and-insert, so two racing
/// inserts of the same key produce exactly one row.
#[derive(Clone)]
pub struct MemoryRelationRepository {
    store: Arc<MemoryStore>,
}

impl MemoryRelationRepository {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RelationRepository for MemoryRelationRepository {
    #[instrument(skip(self, relation), fields(kind = %relation.kind, subject = %relation.subject_id, object = %relation.object_id))]
    async fn insert(&self, relation: &EngagementRelation) -> RepoResult<InsertOutcome> {
        if !self.store.user_exists(relation.subject_id) || !self.store.post_exists(relation.object_id)
        {
            return Err(DomainError::InvalidReference(
                "user or event does not exist".to_string(),
            ));
        }

        let key = (relation.kind, relation.subject_id, relation.object_id);
        match self.store.relations.entry(key) {
            Entry::Occupied(_) => Ok(InsertOutcome::AlreadyExists),
            Entry::Vacant(slot) => {
                slot.insert(relation.created_at);
                Ok(InsertOutcome::Inserted)
            }
        }
    }

    async fn delete(
        &self,
        kind: RelationKind,
        subject_id: EntityId,
        object_id: EntityId,
    ) -> RepoResult<bool> {
        Ok(self
            .store
            .relations
            .remove(&(kind, subject_id, object_id))
            .is_some())
    }

    async fn exists(
        &self,
        kind: RelationKind,
        subject_id: EntityId,
        object_id: EntityId,
    ) -> RepoResult<bool> {
        Ok(self.store.relations.contains_key(&(kind, subject_id, object_id)))
    }

    async fn count_by_object(&self, kind: RelationKind, object_id: EntityId) -> RepoResult<i64> {
        Ok(self
            .store
            .relations
            .iter()
            .filter(|entry| {
                let (k, _, object) = *entry.key();
                k == kind && object == object_id
            })
            .count() as i64)
    }

    async fn list_by_subject(
        &self,
        kind: RelationKind,
        subject_id: EntityId,
    ) -> RepoResult<Vec<EntityId>> {
        let mut rows: Vec<_> = self
            .store
            .relations
            .iter()
            .filter(|entry| {
                let (k, subject, _) = *entry.key();
                k == kind && subject == subject_id
            })
            .map(|entry| (*entry.value(), entry.key().2))
            .collect();
        rows.sort_by(|a, b| b.cmp(a));

        Ok(rows.into_iter().map(|(_, object)| object).collect())
    }
}
