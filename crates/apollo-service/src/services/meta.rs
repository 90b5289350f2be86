//! Post meta service
//!
//! Every write goes through the [`MetaKey`] allow-list. A rejected key does
//! not fail the request: it is logged and reported next to the saved keys.

use std::collections::BTreeMap;

use apollo_core::entities::User;
use apollo_core::events::MetaUpdatedEvent;
use apollo_core::{Capabilities, DomainError, DomainEvent, EntityId, MetaKey};
use tracing::{info, instrument, warn};

use crate::dto::{MetaResponse, MetaUpdateResponse, RejectedMeta};

use super::access::{can_view, require_capability};
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Post meta service
pub struct MetaService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MetaService<'a> {
    /// Create a new MetaService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Sanitized values of every stored key
    #[instrument(skip(self, viewer))]
    pub async fn get_all(
        &self,
        viewer: Option<&User>,
        post_id: EntityId,
    ) -> ServiceResult<MetaResponse> {
        self.require_post(viewer, post_id).await?;

        let meta = self
            .ctx
            .meta_repo()
            .get_all(post_id)
            .await?
            .into_iter()
            .map(|(key, raw)| (key.as_str(), key.sanitize_read(&raw)))
            .collect();

        Ok(MetaResponse { post_id, meta })
    }

    /// Validate and store each entry independently
    #[instrument(skip(self, actor, entries), fields(actor = %actor.id, keys = entries.len()))]
    pub async fn update(
        &self,
        actor: &User,
        post_id: EntityId,
        entries: BTreeMap<String, String>,
    ) -> ServiceResult<MetaUpdateResponse> {
        require_capability(actor, Capabilities::EDIT_EVENTS)?;
        self.require_post(Some(actor), post_id).await?;

        let mut response = MetaUpdateResponse::default();
        for (name, raw) in entries {
            let checked = writable_key(&name)
                .and_then(|key| key.validate_write(&raw).map(|value| (key, value)));

            match checked {
                Ok((key, value)) => {
                    self.ctx.meta_repo().set(post_id, key, &value).await?;
                    response.saved.push(key.as_str());
                }
                Err(e) => {
                    warn!(post_id = %post_id, key = %name, code = e.code(), "Meta write rejected");
                    response.rejected.push(RejectedMeta {
                        key: name,
                        code: e.code(),
                        message: e.to_string(),
                    });
                }
            }
        }

        if !response.saved.is_empty() {
            info!(post_id = %post_id, saved = response.saved.len(), "Meta updated");
            let keys = response.saved.iter().map(ToString::to_string).collect();
            self.ctx
                .event_bus()
                .publish(DomainEvent::MetaUpdated(MetaUpdatedEvent::new(post_id, keys)))
                .await;
        }

        Ok(response)
    }

    /// Remove one key; returns false if it was not set
    #[instrument(skip(self, actor), fields(actor = %actor.id))]
    pub async fn delete(&self, actor: &User, post_id: EntityId, name: &str) -> ServiceResult<bool> {
        require_capability(actor, Capabilities::EDIT_EVENTS)?;
        let key = writable_key(name)?;
        self.require_post(Some(actor), post_id).await?;

        let removed = self.ctx.meta_repo().delete(post_id, key).await?;
        if removed {
            info!(post_id = %post_id, key = %key, "Meta key removed");
            self.ctx
                .event_bus()
                .publish(DomainEvent::MetaUpdated(MetaUpdatedEvent::new(
                    post_id,
                    vec![key.to_string()],
                )))
                .await;
        }
        Ok(removed)
    }

    async fn require_post(&self, viewer: Option<&User>, post_id: EntityId) -> ServiceResult<()> {
        match self.ctx.post_repo().find_by_id(post_id).await? {
            Some(post) if can_view(viewer, &post) => Ok(()),
            _ => Err(ServiceError::not_found("Event", post_id)),
        }
    }
}

/// Allow-listed key that clients may write
fn writable_key(name: &str) -> Result<MetaKey, DomainError> {
    let key = MetaKey::parse(name)?;
    if key.is_internal() {
        return Err(DomainError::InvalidKey(name.to_string()));
    }
    Ok(key)
}
