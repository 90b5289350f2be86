//! PostgreSQL implementation of MetaRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{instrument, warn};

use apollo_core::traits::{MetaRepository, RepoResult};
use apollo_core::value_objects::{EntityId, MetaKey};

use crate::models::MetaModel;

use super::error::{map_db_error, map_foreign_key_violation};

/// PostgreSQL implementation of MetaRepository
#[derive(Clone)]
pub struct PgMetaRepository {
    pool: PgPool,
}

impl PgMetaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MetaRepository for PgMetaRepository {
    #[instrument(skip(self))]
    async fn get(&self, post_id: EntityId, key: MetaKey) -> RepoResult<Option<String>> {
        sqlx::query_scalar::<_, String>(
            "SELECT meta_value FROM post_meta WHERE post_id = $1 AND meta_key = $2",
        )
        .bind(post_id.into_inner())
        .bind(key.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn get_all(&self, post_id: EntityId) -> RepoResult<Vec<(MetaKey, String)>> {
        let rows = sqlx::query_as::<_, MetaModel>(
            "SELECT meta_key, meta_value FROM post_meta WHERE post_id = $1",
        )
        .bind(post_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        let mut entries: Vec<(MetaKey, String)> = rows
            .into_iter()
            .filter_map(|row| match MetaKey::parse(&row.meta_key) {
                Ok(key) => Some((key, row.meta_value)),
                Err(_) => {
                    warn!(%post_id, meta_key = %row.meta_key, "Skipping meta key outside the allow-list");
                    None
                }
            })
            .collect();
        entries.sort_by_key(|(key, _)| *key);

        Ok(entries)
    }

    #[instrument(skip(self, value))]
    async fn set(&self, post_id: EntityId, key: MetaKey, value: &str) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO post_meta (post_id, meta_key, meta_value)
            VALUES ($1, $2, $3)
            ON CONFLICT (post_id, meta_key) DO UPDATE SET meta_value = EXCLUDED.meta_value
            ",
        )
        .bind(post_id.into_inner())
        .bind(key.as_str())
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(|e| map_foreign_key_violation(e, "post does not exist"))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, post_id: EntityId, key: MetaKey) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM post_meta WHERE post_id = $1 AND meta_key = $2")
            .bind(post_id.into_inner())
            .bind(key.as_str())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }
}
