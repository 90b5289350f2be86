//! Event listing service
//!
//! CRUD over posts. Only `event_listing` posts take part in engagement and
//! view tracking; DJ and venue posts are plain listings.

use apollo_core::entities::{NewPost, Post, PostStatus, PostType, User};
use apollo_core::events::PostEvent;
use apollo_core::traits::PostQuery;
use apollo_core::{Capabilities, DomainEvent, EntityId};
use tracing::{info, instrument};

use crate::dto::{CreateEventRequest, EventResponse, ListEventsQuery, UpdateEventRequest};

use super::access::{can_view, require_capability};
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

const DEFAULT_PAGE_SIZE: i64 = 20;
const MAX_PAGE_SIZE: i64 = 100;

/// Event listing service
pub struct PostService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PostService<'a> {
    /// Create a new PostService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a listing
    #[instrument(skip(self, actor, request), fields(actor = %actor.id))]
    pub async fn create(
        &self,
        actor: &User,
        request: CreateEventRequest,
    ) -> ServiceResult<EventResponse> {
        require_capability(actor, Capabilities::EDIT_EVENTS)?;

        let post_type = match request.post_type.as_deref() {
            Some(raw) => parse_post_type(raw)?,
            None => PostType::EventListing,
        };
        let status = match request.status.as_deref() {
            Some(raw) => parse_status(raw)?,
            None => PostStatus::Publish,
        };

        let post = self
            .ctx
            .post_repo()
            .create(&NewPost {
                post_type,
                status,
                title: request.title.trim().to_string(),
                content: request.content,
                author_id: actor.id,
            })
            .await?;

        info!(post_id = %post.id, post_type = %post.post_type, "Event created");

        self.ctx
            .event_bus()
            .publish(DomainEvent::PostCreated(PostEvent::new(post.id, actor.id)))
            .await;

        Ok(EventResponse::from(&post))
    }

    /// Fetch a listing; drafts are reported as missing to non-editors
    #[instrument(skip(self, viewer))]
    pub async fn get(&self, viewer: Option<&User>, id: EntityId) -> ServiceResult<EventResponse> {
        let post = self.find_visible(viewer, id).await?;
        Ok(EventResponse::from(&post))
    }

    /// List listings, newest first
    ///
    /// Non-editors only ever see published posts, whatever status they ask for.
    #[instrument(skip(self, viewer))]
    pub async fn list(
        &self,
        viewer: Option<&User>,
        query: ListEventsQuery,
    ) -> ServiceResult<Vec<EventResponse>> {
        let is_editor = viewer.is_some_and(|u| u.can(Capabilities::EDIT_EVENTS));

        let post_type = match query.post_type.as_deref() {
            Some("any") => None,
            Some(raw) => Some(parse_post_type(raw)?),
            None => Some(PostType::EventListing),
        };
        let status = match query.status.as_deref() {
            _ if !is_editor => Some(PostStatus::Publish),
            Some("any") => None,
            Some(raw) => Some(parse_status(raw)?),
            None => Some(PostStatus::Publish),
        };

        let posts = self
            .ctx
            .post_repo()
            .list(&PostQuery {
                post_type,
                status,
                limit: query.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
                offset: query.offset.unwrap_or(0).max(0),
            })
            .await?;

        Ok(posts.iter().map(EventResponse::from).collect())
    }

    /// Update title, content or status
    #[instrument(skip(self, actor, request), fields(actor = %actor.id))]
    pub async fn update(
        &self,
        actor: &User,
        id: EntityId,
        request: UpdateEventRequest,
    ) -> ServiceResult<EventResponse> {
        require_capability(actor, Capabilities::EDIT_EVENTS)?;

        let mut post = self
            .ctx
            .post_repo()
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Event", id))?;

        if let Some(title) = request.title {
            post.set_title(title.trim().to_string());
        }
        if let Some(content) = request.content {
            post.set_content(content);
        }
        if let Some(raw) = request.status.as_deref() {
            post.set_status(parse_status(raw)?);
        }

        self.ctx.post_repo().update(&post).await?;
        info!(post_id = %post.id, "Event updated");

        self.ctx
            .event_bus()
            .publish(DomainEvent::PostUpdated(PostEvent::new(post.id, actor.id)))
            .await;

        Ok(EventResponse::from(&post))
    }

    /// Delete a listing with its meta, relations and view stats
    #[instrument(skip(self, actor), fields(actor = %actor.id))]
    pub async fn delete(&self, actor: &User, id: EntityId) -> ServiceResult<()> {
        require_capability(actor, Capabilities::DELETE_EVENTS)?;

        if !self.ctx.post_repo().delete(id).await? {
            return Err(ServiceError::not_found("Event", id));
        }
        self.ctx.counter_locks().forget(id);
        info!(post_id = %id, "Event deleted");

        self.ctx
            .event_bus()
            .publish(DomainEvent::PostDeleted(PostEvent::new(id, actor.id)))
            .await;

        Ok(())
    }

    /// Load a post the viewer is allowed to see
    pub async fn find_visible(&self, viewer: Option<&User>, id: EntityId) -> ServiceResult<Post> {
        self.ctx
            .post_repo()
            .find_by_id(id)
            .await?
            .filter(|post| can_view(viewer, post))
            .ok_or_else(|| ServiceError::not_found("Event", id))
    }

    /// Load a post only if it is an event listing
    pub async fn find_event_listing(&self, id: EntityId) -> ServiceResult<Option<Post>> {
        Ok(self
            .ctx
            .post_repo()
            .find_by_id(id)
            .await?
            .filter(Post::is_event_listing))
    }
}

fn parse_post_type(raw: &str) -> ServiceResult<PostType> {
    PostType::parse(raw).ok_or_else(|| ServiceError::validation(format!("unknown post type: {raw}")))
}

fn parse_status(raw: &str) -> ServiceResult<PostStatus> {
    PostStatus::parse(raw).ok_or_else(|| ServiceError::validation(format!("unknown status: {raw}")))
}
