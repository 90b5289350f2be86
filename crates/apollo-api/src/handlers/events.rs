//! Event listing handlers
//!
//! Listing CRUD plus the escaped HTML card.

use axum::{extract::State, response::Html};
use apollo_common::NonceAction;
use apollo_service::dto::{
    CreateEventRequest, EventResponse, ListEventsQuery, NonceForm, UpdateEventRequest,
};
use apollo_service::{MetaService, PostService};
use serde_json::{json, Value};
use validator::Validate;

use super::require_nonce;
use crate::extractors::{AuthUser, FormBody, IdPath, OptionalAuthUser, QueryParams};
use crate::render;
use crate::response::{Ajax, ApiResult, Created};
use crate::state::AppState;

/// List listings, newest first
///
/// GET /events
pub async fn list(
    State(state): State<AppState>,
    OptionalAuthUser(user): OptionalAuthUser,
    QueryParams(query): QueryParams<ListEventsQuery>,
) -> ApiResult<Ajax<Vec<EventResponse>>> {
    let events = PostService::new(state.service_context())
        .list(user.as_ref(), query)
        .await?;

    Ok(Ajax(events))
}

/// Create a listing
///
/// POST /events
pub async fn create(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    FormBody(request): FormBody<CreateEventRequest>,
) -> ApiResult<Created<Ajax<EventResponse>>> {
    require_nonce(&state, Some(&user), &request.nonce, NonceAction::EditEvent)?;
    request.validate()?;

    let event = PostService::new(state.service_context())
        .create(&user, request)
        .await?;

    Ok(Created(Ajax(event)))
}

/// Get one listing
///
/// GET /events/:id
pub async fn get(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    OptionalAuthUser(user): OptionalAuthUser,
) -> ApiResult<Ajax<EventResponse>> {
    let event = PostService::new(state.service_context())
        .get(user.as_ref(), id)
        .await?;

    Ok(Ajax(event))
}

/// Update title, content or status
///
/// POST /events/:id
pub async fn update(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    IdPath(id): IdPath,
    FormBody(request): FormBody<UpdateEventRequest>,
) -> ApiResult<Ajax<EventResponse>> {
    require_nonce(&state, Some(&user), &request.nonce, NonceAction::EditEvent)?;
    request.validate()?;

    let event = PostService::new(state.service_context())
        .update(&user, id, request)
        .await?;

    Ok(Ajax(event))
}

/// Delete a listing with its meta, relations and view stats
///
/// POST /events/:id/delete
pub async fn delete(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    IdPath(id): IdPath,
    FormBody(form): FormBody<NonceForm>,
) -> ApiResult<Ajax<Value>> {
    require_nonce(&state, Some(&user), &form.nonce, NonceAction::EditEvent)?;

    PostService::new(state.service_context())
        .delete(&user, id)
        .await?;

    Ok(Ajax(json!({ "id": id, "deleted": true })))
}

/// Listing card fragment
///
/// GET /events/:id/card
pub async fn card(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    OptionalAuthUser(user): OptionalAuthUser,
) -> ApiResult<Html<String>> {
    let ctx = state.service_context();
    let event = PostService::new(ctx).get(user.as_ref(), id).await?;
    let meta = MetaService::new(ctx).get_all(user.as_ref(), id).await?;

    Ok(Html(render::event_card(&event, &meta)))
}
