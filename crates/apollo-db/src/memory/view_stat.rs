//! In-process implementation of ViewStatRepository

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use apollo_core::entities::{StatsSnapshot, ViewKind, ViewStat};
use apollo_core::error::DomainError;
use apollo_core::traits::{RepoResult, ViewStatRepository};
use apollo_core::value_objects::EntityId;

use super::store::MemoryStore;

#[derive(Clone)]
pub struct MemoryViewStatRepository {
    store: Arc<MemoryStore>,
}

impl MemoryViewStatRepository {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ViewStatRepository for MemoryViewStatRepository {
    async fn record(
        &self,
        object_id: EntityId,
        kind: ViewKind,
        date: NaiveDate,
        at: DateTime<Utc>,
    ) -> RepoResult<ViewStat> {
        if !self.store.post_exists(object_id) {
            return Err(DomainError::InvalidReference("event does not exist".to_string()));
        }

        // The entry guard serializes read-modify-write per event
        let mut stat = self
            .store
            .views
            .entry(object_id)
            .or_insert_with(|| ViewStat::new(object_id));
        stat.record(kind, date, at);
        Ok(stat.clone())
    }

    async fn find(&self, object_id: EntityId) -> RepoResult<Option<ViewStat>> {
        Ok(self.store.views.get(&object_id).map(|s| s.value().clone()))
    }

    async fn top(&self, limit: i64) -> RepoResult<Vec<(EntityId, StatsSnapshot)>> {
        let mut rows: Vec<(EntityId, StatsSnapshot)> = self
            .store
            .views
            .iter()
            .map(|entry| (*entry.key(), entry.value().snapshot()))
            .collect();
        rows.sort_by(|a, b| b.1.total_count.cmp(&a.1.total_count).then(a.0.cmp(&b.0)));
        rows.truncate(limit.max(0) as usize);
        Ok(rows)
    }
}
