//! PostgreSQL implementation of ViewStatRepository

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use tracing::instrument;

use apollo_core::entities::{StatsSnapshot, ViewKind, ViewStat, MAX_DAILY_BUCKETS};
use apollo_core::traits::{RepoResult, ViewStatRepository};
use apollo_core::value_objects::EntityId;

use crate::mappers::view_stat_from_rows;
use crate::models::{DailyViewModel, ViewStatModel};

use super::error::{map_db_error, map_foreign_key_violation};

/// PostgreSQL implementation of ViewStatRepository
#[derive(Clone)]
pub struct PgViewStatRepository {
    pool: PgPool,
}

impl PgViewStatRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_DAYS: &str = r"
    SELECT day, page, popup, total
    FROM event_view_daily
    WHERE object_id = $1
    ORDER BY day
";

#[async_trait]
impl ViewStatRepository for PgViewStatRepository {
    #[instrument(skip(self))]
    async fn record(
        &self,
        object_id: EntityId,
        kind: ViewKind,
        date: NaiveDate,
        at: DateTime<Utc>,
    ) -> RepoResult<ViewStat> {
        let (page, popup) = match kind {
            ViewKind::Page => (1_i64, 0_i64),
            ViewKind::Popup => (0, 1),
        };

        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // The upsert row-locks the aggregate, so concurrent views of the same
        // event apply their daily update and eviction one after another.
        let stat = sqlx::query_as::<_, ViewStatModel>(
            r"
            INSERT INTO event_view_stats (object_id, page_count, popup_count, total_count, last_viewed_at)
            VALUES ($1, $2, $3, 1, $4)
            ON CONFLICT (object_id) DO UPDATE SET
                page_count = event_view_stats.page_count + EXCLUDED.page_count,
                popup_count = event_view_stats.popup_count + EXCLUDED.popup_count,
                total_count = event_view_stats.total_count + 1,
                last_viewed_at = EXCLUDED.last_viewed_at
            RETURNING object_id, page_count, popup_count, total_count, last_viewed_at
            ",
        )
        .bind(object_id.into_inner())
        .bind(page)
        .bind(popup)
        .bind(at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_foreign_key_violation(e, "event does not exist"))?;

        sqlx::query(
            r"
            INSERT INTO event_view_daily (object_id, day, page, popup, total)
            VALUES ($1, $2, $3, $4, 1)
            ON CONFLICT (object_id, day) DO UPDATE SET
                page = event_view_daily.page + EXCLUDED.page,
                popup = event_view_daily.popup + EXCLUDED.popup,
                total = event_view_daily.total + 1
            ",
        )
        .bind(object_id.into_inner())
        .bind(date)
        .bind(page)
        .bind(popup)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        sqlx::query(
            r"
            DELETE FROM event_view_daily
            WHERE object_id = $1
              AND day NOT IN (
                  SELECT day FROM event_view_daily
                  WHERE object_id = $1
                  ORDER BY day DESC
                  LIMIT $2
              )
            ",
        )
        .bind(object_id.into_inner())
        .bind(MAX_DAILY_BUCKETS as i64)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        let days = sqlx::query_as::<_, DailyViewModel>(SELECT_DAYS)
            .bind(object_id.into_inner())
            .fetch_all(&mut *tx)
            .await
            .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(view_stat_from_rows(stat, days))
    }

    #[instrument(skip(self))]
    async fn find(&self, object_id: EntityId) -> RepoResult<Option<ViewStat>> {
        let stat = sqlx::query_as::<_, ViewStatModel>(
            r"
            SELECT object_id, page_count, popup_count, total_count, last_viewed_at
            FROM event_view_stats
            WHERE object_id = $1
            ",
        )
        .bind(object_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        let Some(stat) = stat else {
            return Ok(None);
        };

        let days = sqlx::query_as::<_, DailyViewModel>(SELECT_DAYS)
            .bind(object_id.into_inner())
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(Some(view_stat_from_rows(stat, days)))
    }

    #[instrument(skip(self))]
    async fn top(&self, limit: i64) -> RepoResult<Vec<(EntityId, StatsSnapshot)>> {
        let rows = sqlx::query_as::<_, ViewStatModel>(
            r"
            SELECT object_id, page_count, popup_count, total_count, last_viewed_at
            FROM event_view_stats
            ORDER BY total_count DESC, object_id
            LIMIT $1
            ",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows
            .iter()
            .map(|row| (EntityId::new(row.object_id), StatsSnapshot::from(row)))
            .collect())
    }
}
