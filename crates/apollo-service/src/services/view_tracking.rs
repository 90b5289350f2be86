//! View tracking service
//!
//! Counts page and popup views per event. Lifetime counters grow without
//! bound; the per-day series keeps the newest 90 calendar days of the site
//! time zone.

use apollo_core::entities::{Post, User, ViewKind, ViewStat};
use apollo_core::events::ViewRecordedEvent;
use apollo_core::{Capabilities, DomainError, DomainEvent, EntityId};
use tracing::{debug, instrument};

use crate::dto::{TopEventResponse, ViewSnapshotResponse, ViewStatsResponse};

use super::access::{can_view, require_capability};
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

const DEFAULT_TOP_LIMIT: i64 = 10;
const MAX_TOP_LIMIT: i64 = 50;

/// View tracking service
pub struct ViewTrackingService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ViewTrackingService<'a> {
    /// Create a new ViewTrackingService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Count one view of an event listing
    ///
    /// Every call increments; deduplicating repeat views is up to the caller.
    /// Drafts the viewer may not see are reported as not found.
    #[instrument(skip(self, viewer), fields(object = %object_id, kind = %kind))]
    pub async fn record_view(
        &self,
        viewer: Option<&User>,
        object_id: EntityId,
        kind: ViewKind,
    ) -> ServiceResult<ViewSnapshotResponse> {
        self.require_event_listing(object_id, viewer).await?;

        let at = self.ctx.clock().now();
        let date = self.ctx.clock().date_of(at);

        let stat = self
            .ctx
            .view_repo()
            .record(object_id, kind, date, at)
            .await
            .map_err(|e| match e {
                // deleted between the lookup and the write
                DomainError::InvalidReference(_) => ServiceError::not_found("Event", object_id),
                other => other.into(),
            })?;

        debug!(total = stat.total_count, days = stat.daily.len(), "View recorded");

        self.ctx
            .event_bus()
            .publish(DomainEvent::ViewRecorded(ViewRecordedEvent::new(
                object_id,
                kind,
                stat.total_count,
            )))
            .await;

        Ok(stat.snapshot().into())
    }

    /// Counters and daily series of one event, oldest day first
    #[instrument(skip(self, actor), fields(actor = %actor.id))]
    pub async fn stats(&self, actor: &User, object_id: EntityId) -> ServiceResult<ViewStatsResponse> {
        require_capability(actor, Capabilities::VIEW_STATS)?;
        self.require_event_listing(object_id, Some(actor)).await?;

        let stat = self
            .ctx
            .view_repo()
            .find(object_id)
            .await?
            .unwrap_or_else(|| ViewStat::new(object_id));

        Ok(ViewStatsResponse::from(&stat))
    }

    /// Most viewed events by lifetime total
    #[instrument(skip(self, actor), fields(actor = %actor.id))]
    pub async fn top_events(
        &self,
        actor: &User,
        limit: Option<i64>,
    ) -> ServiceResult<Vec<TopEventResponse>> {
        require_capability(actor, Capabilities::VIEW_STATS)?;

        let limit = limit.unwrap_or(DEFAULT_TOP_LIMIT).clamp(1, MAX_TOP_LIMIT);
        let top = self.ctx.view_repo().top(limit).await?;

        let mut rows = Vec::with_capacity(top.len());
        for (id, snapshot) in top {
            // stats rows are cascaded with their post, so a miss is a race with delete
            if let Some(post) = self.ctx.post_repo().find_by_id(id).await? {
                rows.push(TopEventResponse {
                    id,
                    title: post.title,
                    snapshot: snapshot.into(),
                });
            }
        }
        Ok(rows)
    }

    async fn require_event_listing(
        &self,
        object_id: EntityId,
        viewer: Option<&User>,
    ) -> ServiceResult<Post> {
        self.ctx
            .post_repo()
            .find_by_id(object_id)
            .await?
            .filter(|post| post.is_event_listing() && can_view(viewer, post))
            .ok_or_else(|| ServiceError::not_found("Event", object_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use apollo_core::entities::{PostStatus, PostType, Role};

    use crate::services::test_support::{memory_context, seed_event, seed_post_of_type, seed_user};

    #[tokio::test]
    async fn test_page_and_popup_counts() {
        let ctx = memory_context();
        let user = seed_user(&ctx, "editor", Role::Editor).await;
        let event = seed_event(&ctx, &user, "Rooftop").await;
        let service = ViewTrackingService::new(&ctx);

        for _ in 0..3 {
            service.record_view(None, event.id, ViewKind::Page).await.unwrap();
        }
        let mut last = None;
        for _ in 0..2 {
            last = Some(service.record_view(None, event.id, ViewKind::Popup).await.unwrap());
        }

        let snapshot = last.unwrap();
        assert_eq!(snapshot.page_count, 3);
        assert_eq!(snapshot.popup_count, 2);
        assert_eq!(snapshot.total_count, 5);
        assert!(snapshot.last_viewed_at.is_some());

        let stats = service.stats(&user, event.id).await.unwrap();
        assert_eq!(stats.daily.len(), 1);
        assert_eq!(stats.daily[0].date, ctx.clock().today());
        assert_eq!(stats.daily[0].total, 5);
    }

    #[tokio::test]
    async fn test_record_view_of_unknown_or_wrong_type_is_not_found() {
        let ctx = memory_context();
        let user = seed_user(&ctx, "editor", Role::Editor).await;
        let venue = seed_post_of_type(&ctx, &user, PostType::EventLocal).await;
        let service = ViewTrackingService::new(&ctx);

        let err = service
            .record_view(None, EntityId::new(404), ViewKind::Page)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 404);

        let err = service.record_view(None, venue.id, ViewKind::Page).await.unwrap_err();
        assert_eq!(err.status_code(), 404);
    }

    #[tokio::test]
    async fn test_draft_views_need_an_editor() {
        let ctx = memory_context();
        let editor = seed_user(&ctx, "editor", Role::Editor).await;
        let member = seed_user(&ctx, "sam", Role::Subscriber).await;
        let mut draft = seed_event(&ctx, &editor, "Unannounced").await;
        draft.set_status(PostStatus::Draft);
        ctx.post_repo().update(&draft).await.unwrap();
        let service = ViewTrackingService::new(&ctx);

        let err = service.record_view(None, draft.id, ViewKind::Page).await.unwrap_err();
        assert_eq!(err.status_code(), 404);
        let err = service
            .record_view(Some(&member), draft.id, ViewKind::Popup)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 404);
        assert!(ctx.view_repo().find(draft.id).await.unwrap().is_none());

        let snapshot = service
            .record_view(Some(&editor), draft.id, ViewKind::Page)
            .await
            .unwrap();
        assert_eq!(snapshot.total_count, 1);
    }

    #[tokio::test]
    async fn test_stats_for_never_viewed_event_are_zero() {
        let ctx = memory_context();
        let user = seed_user(&ctx, "editor", Role::Editor).await;
        let event = seed_event(&ctx, &user, "Rooftop").await;

        let stats = ViewTrackingService::new(&ctx).stats(&user, event.id).await.unwrap();
        assert_eq!(stats.snapshot.total_count, 0);
        assert!(stats.snapshot.last_viewed_at.is_none());
        assert!(stats.daily.is_empty());
    }

    #[tokio::test]
    async fn test_stats_require_capability() {
        let ctx = memory_context();
        let reader = seed_user(&ctx, "reader", Role::Subscriber).await;
        let event = seed_event(&ctx, &reader, "Rooftop").await;
        let service = ViewTrackingService::new(&ctx);

        assert_eq!(
            service.stats(&reader, event.id).await.unwrap_err().error_code(),
            "forbidden"
        );
        assert_eq!(
            service.top_events(&reader, None).await.unwrap_err().error_code(),
            "forbidden"
        );
    }

    #[tokio::test]
    async fn test_top_events_ordered_by_total() {
        let ctx = memory_context();
        let user = seed_user(&ctx, "editor", Role::Editor).await;
        let quiet = seed_event(&ctx, &user, "Quiet").await;
        let busy = seed_event(&ctx, &user, "Busy").await;
        let service = ViewTrackingService::new(&ctx);

        service.record_view(None, quiet.id, ViewKind::Page).await.unwrap();
        for _ in 0..3 {
            service.record_view(None, busy.id, ViewKind::Popup).await.unwrap();
        }

        let top = service.top_events(&user, Some(500)).await.unwrap();
        let titles: Vec<_> = top.iter().map(|row| row.title.as_str()).collect();
        assert_eq!(titles, ["Busy", "Quiet"]);
        assert_eq!(top[0].snapshot.popup_count, 3);

        let top = service.top_events(&user, Some(0)).await.unwrap();
        assert_eq!(top.len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_views_are_all_counted() {
        let ctx = Arc::new(memory_context());
        let user = seed_user(&ctx, "editor", Role::Editor).await;
        let event_id = seed_event(&ctx, &user, "Rooftop").await.id;

        let handles: Vec<_> = (0..20)
            .map(|i| {
                let ctx = ctx.clone();
                let kind = if i % 4 == 0 { ViewKind::Popup } else { ViewKind::Page };
                tokio::spawn(async move {
                    ViewTrackingService::new(&ctx).record_view(None, event_id, kind).await
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let stats = ViewTrackingService::new(&ctx).stats(&user, event_id).await.unwrap();
        assert_eq!(stats.snapshot.page_count, 15);
        assert_eq!(stats.snapshot.popup_count, 5);
        assert_eq!(stats.snapshot.total_count, 20);
    }
}
