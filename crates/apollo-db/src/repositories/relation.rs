//! PostgreSQL implementation of RelationRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use apollo_core::entities::{EngagementRelation, RelationKind};
use apollo_core::traits::{InsertOutcome, RelationRepository, RepoResult};
use apollo_core::value_objects::EntityId;

use super::error::{map_db_error, map_foreign_key_violation};

/// PostgreSQL implementation of RelationRepository
///
/// The primary key (kind, subject_id, object_id) serializes concurrent inserts.
#[derive(Clone)]
pub struct PgRelationRepository {
    pool: PgPool,
}

impl PgRelationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RelationRepository for PgRelationRepository {
    #[instrument(skip(self, relation), fields(kind = %relation.kind, subject = %relation.subject_id, object = %relation.object_id))]
    async fn insert(&self, relation: &EngagementRelation) -> RepoResult<InsertOutcome> {
        let result = sqlx::query(
            r"
            INSERT INTO event_relations (kind, subject_id, object_id, created_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (kind, subject_id, object_id) DO NOTHING
            ",
        )
        .bind(relation.kind.as_str())
        .bind(relation.subject_id.into_inner())
        .bind(relation.object_id.into_inner())
        .bind(relation.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_foreign_key_violation(e, "user or event does not exist"))?;

        Ok(if result.rows_affected() == 0 {
            InsertOutcome::AlreadyExists
        } else {
            InsertOutcome::Inserted
        })
    }

    #[instrument(skip(self))]
    async fn delete(
        &self,
        kind: RelationKind,
        subject_id: EntityId,
        object_id: EntityId,
    ) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            DELETE FROM event_relations
            WHERE kind = $1 AND subject_id = $2 AND object_id = $3
            ",
        )
        .bind(kind.as_str())
        .bind(subject_id.into_inner())
        .bind(object_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn exists(
        &self,
        kind: RelationKind,
        subject_id: EntityId,
        object_id: EntityId,
    ) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>(
            r"
            SELECT EXISTS(
                SELECT 1 FROM event_relations
                WHERE kind = $1 AND subject_id = $2 AND object_id = $3
            )
            ",
        )
        .bind(kind.as_str())
        .bind(subject_id.into_inner())
        .bind(object_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn count_by_object(&self, kind: RelationKind, object_id: EntityId) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM event_relations WHERE kind = $1 AND object_id = $2",
        )
        .bind(kind.as_str())
        .bind(object_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn list_by_subject(
        &self,
        kind: RelationKind,
        subject_id: EntityId,
    ) -> RepoResult<Vec<EntityId>> {
        let ids = sqlx::query_scalar::<_, i64>(
            r"
            SELECT object_id FROM event_relations
            WHERE kind = $1 AND subject_id = $2
            ORDER BY created_at DESC, object_id DESC
            ",
        )
        .bind(kind.as_str())
        .bind(subject_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(ids.into_iter().map(EntityId::new).collect())
    }
}
