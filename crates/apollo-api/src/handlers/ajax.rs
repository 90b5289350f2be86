//! Engagement handlers
//!
//! Nonce issuing, relation toggles, button state, the user's lists and view
//! tracking. Identity is checked first, then the nonce, then the form.

use axum::extract::State;
use apollo_common::NonceAction;
use apollo_core::ViewKind;
use apollo_service::dto::{
    NonceQuery, NonceResponse, RelationListResponse, RelationStatusResponse, ToggleRequest,
    ToggleResponse, ViewRequest, ViewSnapshotResponse,
};
use apollo_service::{AuthService, EngagementService, ViewTrackingService};
use validator::Validate;

use super::require_nonce;
use crate::extractors::{
    AuthUser, FormBody, KindPath, OptionalAuthUser, QueryParams, RelationPath,
};
use crate::response::{Ajax, ApiError, ApiResult};
use crate::state::AppState;

/// Issue a nonce for the current visitor
///
/// GET /ajax/nonce?action=toggle
pub async fn nonce(
    State(state): State<AppState>,
    OptionalAuthUser(user): OptionalAuthUser,
    QueryParams(query): QueryParams<NonceQuery>,
) -> ApiResult<Ajax<NonceResponse>> {
    let action = NonceAction::parse(&query.action).ok_or_else(|| {
        ApiError::invalid_query(format!("unknown nonce action: {}", query.action))
    })?;

    let response = AuthService::new(state.service_context()).issue_nonce(user.as_ref(), action)?;
    Ok(Ajax(response))
}

/// Flip a favorite, bookmark or interest
///
/// POST /ajax/toggle/:kind
pub async fn toggle(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    KindPath(kind): KindPath,
    FormBody(request): FormBody<ToggleRequest>,
) -> ApiResult<Ajax<ToggleResponse>> {
    require_nonce(&state, Some(&user), &request.nonce, NonceAction::Toggle)?;

    let outcome = EngagementService::new(state.service_context())
        .toggle(kind, user.id, request.event_id)
        .await?;

    Ok(Ajax(outcome.into()))
}

/// Button state for one event
///
/// GET /ajax/status/:kind/:event_id
pub async fn status(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    path: RelationPath,
) -> ApiResult<Ajax<RelationStatusResponse>> {
    let response = EngagementService::new(state.service_context())
        .status(path.kind, user.id, path.event_id)
        .await?;

    Ok(Ajax(response))
}

/// The current user's favorites, bookmarks or interests
///
/// GET /ajax/relations/:kind
pub async fn relations(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    KindPath(kind): KindPath,
) -> ApiResult<Ajax<RelationListResponse>> {
    let response = EngagementService::new(state.service_context())
        .list_for_user(kind, &user)
        .await?;

    Ok(Ajax(response))
}

/// Count a page or popup view
///
/// POST /ajax/view
pub async fn view(
    State(state): State<AppState>,
    OptionalAuthUser(user): OptionalAuthUser,
    FormBody(request): FormBody<ViewRequest>,
) -> ApiResult<Ajax<ViewSnapshotResponse>> {
    require_nonce(&state, user.as_ref(), &request.nonce, NonceAction::View)?;
    request.validate()?;

    let kind = match request.kind.as_deref() {
        None => ViewKind::Page,
        Some(raw) => ViewKind::parse(raw)
            .ok_or_else(|| ApiError::invalid_form(format!("unknown view kind: {raw}")))?,
    };

    let snapshot = ViewTrackingService::new(state.service_context())
        .record_view(user.as_ref(), request.event_id, kind)
        .await?;

    Ok(Ajax(snapshot))
}
