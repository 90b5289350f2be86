//! Engagement service - favorites, bookmarks and interest
//!
//! A toggle flips one user↔event relation and then rewrites the event's
//! counter meta from a full count of the relation rows, so the counter heals
//! from any earlier drift on every mutation.

use apollo_core::entities::{
    EngagementRelation, PostType, RelationKind, ToggleOutcome, ToggleState, User,
};
use apollo_core::events::{CountersReconciledEvent, RelationChangedEvent};
use apollo_core::{Capabilities, DomainError, DomainEvent, EntityId, InsertOutcome};
use tracing::{debug, info, instrument};

use crate::dto::{EventResponse, ReconcileResponse, RelationListResponse, RelationStatusResponse};

use super::access::{can_view, require_capability};
use super::context::ServiceContext;
use super::error::ServiceResult;

/// Engagement service
pub struct EngagementService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> EngagementService<'a> {
    /// Create a new EngagementService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Add the relation if absent, remove it if present
    ///
    /// Fails with `InvalidReference` before any mutation when the user does
    /// not exist or the object is not an event listing the user may see.
    #[instrument(skip(self), fields(kind = %kind, subject = %subject_id, object = %object_id))]
    pub async fn toggle(
        &self,
        kind: RelationKind,
        subject_id: EntityId,
        object_id: EntityId,
    ) -> ServiceResult<ToggleOutcome> {
        let subject = self.require_subject(subject_id).await?;
        self.require_event_listing(object_id, Some(&subject)).await?;

        let guard = self.ctx.counter_locks().acquire(kind, object_id).await;
        let relations = self.ctx.relation_repo();

        let state = if relations.exists(kind, subject_id, object_id).await? {
            if !relations.delete(kind, subject_id, object_id).await? {
                debug!("Relation already removed by a concurrent request");
            }
            ToggleState::Removed
        } else {
            let relation = EngagementRelation::new(kind, subject_id, object_id);
            if relations.insert(&relation).await? == InsertOutcome::AlreadyExists {
                debug!("Relation already added by a concurrent request");
            }
            ToggleState::Added
        };

        let count = self.recount(kind, object_id).await?;
        drop(guard);

        info!(state = state.as_str(), count, "Relation toggled");

        let event = RelationChangedEvent::new(kind, subject_id, object_id, count);
        self.ctx
            .event_bus()
            .publish(match state {
                ToggleState::Added => DomainEvent::RelationAdded(event),
                ToggleState::Removed => DomainEvent::RelationRemoved(event),
            })
            .await;

        Ok(ToggleOutcome { state, count })
    }

    /// Whether the user holds the relation, with the stored counter
    #[instrument(skip(self))]
    pub async fn status(
        &self,
        kind: RelationKind,
        subject_id: EntityId,
        object_id: EntityId,
    ) -> ServiceResult<RelationStatusResponse> {
        let viewer = self.ctx.user_repo().find_by_id(subject_id).await?;
        self.require_event_listing(object_id, viewer.as_ref()).await?;

        let active = self
            .ctx
            .relation_repo()
            .exists(kind, subject_id, object_id)
            .await?;
        let key = kind.counter_key();
        let count = self
            .ctx
            .meta_repo()
            .get(object_id, key)
            .await?
            .and_then(|raw| key.sanitize_read(&raw).as_integer())
            .unwrap_or(0);

        Ok(RelationStatusResponse { kind, active, count })
    }

    /// Events the user holds a relation to, newest relation first
    ///
    /// Events the user may no longer see (unpublished) are left out.
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn list_for_user(
        &self,
        kind: RelationKind,
        user: &User,
    ) -> ServiceResult<RelationListResponse> {
        let ids = self.ctx.relation_repo().list_by_subject(kind, user.id).await?;

        let mut events = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(post) = self.ctx.post_repo().find_by_id(id).await? {
                if can_view(Some(user), &post) {
                    events.push(EventResponse::from(&post));
                }
            }
        }

        Ok(RelationListResponse { kind, events })
    }

    /// Recount every counter of every event listing and rewrite the stale ones
    #[instrument(skip(self, actor), fields(actor = %actor.id))]
    pub async fn reconcile_counters(&self, actor: &User) -> ServiceResult<ReconcileResponse> {
        require_capability(actor, Capabilities::MANAGE_OPTIONS)?;

        let ids = self
            .ctx
            .post_repo()
            .ids_by_type(PostType::EventListing)
            .await?;

        let mut counters_changed = 0;
        for &object_id in &ids {
            for kind in RelationKind::ALL {
                let _guard = self.ctx.counter_locks().acquire(kind, object_id).await;

                let count = self
                    .ctx
                    .relation_repo()
                    .count_by_object(kind, object_id)
                    .await?;
                let expected = count.to_string();
                let stored = self.ctx.meta_repo().get(object_id, kind.counter_key()).await?;

                if stored.as_deref() != Some(expected.as_str()) {
                    debug!(
                        object_id = %object_id,
                        kind = %kind,
                        stored = stored.as_deref().unwrap_or("<unset>"),
                        count,
                        "Counter repaired"
                    );
                    self.ctx
                        .meta_repo()
                        .set(object_id, kind.counter_key(), &expected)
                        .await?;
                    counters_changed += 1;
                }
            }
        }

        info!(events_scanned = ids.len(), counters_changed, "Counters reconciled");

        self.ctx
            .event_bus()
            .publish(DomainEvent::CountersReconciled(CountersReconciledEvent::new(
                ids.len(),
                counters_changed,
            )))
            .await;

        Ok(ReconcileResponse {
            events_scanned: ids.len(),
            counters_changed,
        })
    }

    async fn recount(&self, kind: RelationKind, object_id: EntityId) -> ServiceResult<i64> {
        let count = self
            .ctx
            .relation_repo()
            .count_by_object(kind, object_id)
            .await?;
        self.ctx
            .meta_repo()
            .set(object_id, kind.counter_key(), &count.to_string())
            .await?;
        Ok(count)
    }

    async fn require_subject(&self, subject_id: EntityId) -> ServiceResult<User> {
        match self.ctx.user_repo().find_by_id(subject_id).await? {
            Some(user) => Ok(user),
            None => Err(DomainError::InvalidReference(format!("user {subject_id} does not exist")).into()),
        }
    }

    /// Drafts hidden from the viewer are reported exactly like missing events
    async fn require_event_listing(
        &self,
        object_id: EntityId,
        viewer: Option<&User>,
    ) -> ServiceResult<()> {
        match self.ctx.post_repo().find_by_id(object_id).await? {
            Some(post) if post.is_event_listing() && can_view(viewer, &post) => Ok(()),
            Some(post) if post.is_event_listing() => {
                Err(DomainError::InvalidReference(format!("event {object_id} does not exist")).into())
            }
            Some(_) => Err(DomainError::InvalidReference(format!(
                "post {object_id} is not an event listing"
            ))
            .into()),
            None => Err(DomainError::InvalidReference(format!("event {object_id} does not exist")).into()),
        }
    }
}
