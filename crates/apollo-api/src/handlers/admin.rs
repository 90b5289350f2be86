//! Administration handlers

use axum::extract::State;
use apollo_common::NonceAction;
use apollo_service::dto::{NonceForm, ReconcileResponse};
use apollo_service::EngagementService;

use super::require_nonce;
use crate::extractors::{AuthUser, FormBody};
use crate::response::{Ajax, ApiResult};
use crate::state::AppState;

/// Recount every engagement counter from the relation rows
///
/// POST /admin/recount
pub async fn recount(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    FormBody(form): FormBody<NonceForm>,
) -> ApiResult<Ajax<ReconcileResponse>> {
    require_nonce(&state, Some(&user), &form.nonce, NonceAction::Admin)?;

    let report = EngagementService::new(state.service_context())
        .reconcile_counters(&user)
        .await?;

    Ok(Ajax(report))
}
