//! View statistics handlers

use axum::extract::State;
use apollo_service::dto::{TopEventResponse, TopEventsQuery, ViewStatsResponse};
use apollo_service::ViewTrackingService;

use crate::extractors::{AuthUser, IdPath, QueryParams};
use crate::response::{Ajax, ApiResult};
use crate::state::AppState;

/// Counters and the daily series of one listing
///
/// GET /events/:id/stats
pub async fn event_stats(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    IdPath(id): IdPath,
) -> ApiResult<Ajax<ViewStatsResponse>> {
    let stats = ViewTrackingService::new(state.service_context())
        .stats(&user, id)
        .await?;

    Ok(Ajax(stats))
}

/// Most viewed listings
///
/// GET /dashboard/top-events?limit=10
pub async fn top_events(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    QueryParams(query): QueryParams<TopEventsQuery>,
) -> ApiResult<Ajax<Vec<TopEventResponse>>> {
    let rows = ViewTrackingService::new(state.service_context())
        .top_events(&user, query.limit)
        .await?;

    Ok(Ajax(rows))
}
