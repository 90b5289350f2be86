//! Event meta handlers
//!
//! Reads are sanitized per key; writes go through the allow-list one entry
//! at a time and report the keys that were refused.

use std::collections::BTreeMap;

use axum::extract::State;
use apollo_common::NonceAction;
use apollo_service::dto::{DeleteMetaRequest, MetaResponse, MetaUpdateResponse};
use apollo_service::MetaService;
use serde_json::{json, Value};
use validator::Validate;

use super::require_nonce;
use crate::extractors::{AuthUser, FormBody, IdPath, OptionalAuthUser};
use crate::response::{Ajax, ApiResult};
use crate::state::AppState;

/// Sanitized meta of a listing
///
/// GET /events/:id/meta
pub async fn get_meta(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    OptionalAuthUser(user): OptionalAuthUser,
) -> ApiResult<Ajax<MetaResponse>> {
    let meta = MetaService::new(state.service_context())
        .get_all(user.as_ref(), id)
        .await?;

    Ok(Ajax(meta))
}

/// Store every form field except `nonce` as a meta entry
///
/// POST /events/:id/meta
pub async fn update_meta(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    IdPath(id): IdPath,
    FormBody(mut fields): FormBody<BTreeMap<String, String>>,
) -> ApiResult<Ajax<MetaUpdateResponse>> {
    let nonce = fields.remove("nonce").unwrap_or_default();
    require_nonce(&state, Some(&user), &nonce, NonceAction::EditEvent)?;

    let response = MetaService::new(state.service_context())
        .update(&user, id, fields)
        .await?;

    Ok(Ajax(response))
}

/// Remove one meta key
///
/// POST /events/:id/meta/delete
pub async fn delete_meta(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    IdPath(id): IdPath,
    FormBody(request): FormBody<DeleteMetaRequest>,
) -> ApiResult<Ajax<Value>> {
    require_nonce(&state, Some(&user), &request.nonce, NonceAction::EditEvent)?;
    request.validate()?;

    let removed = MetaService::new(state.service_context())
        .delete(&user, id, &request.key)
        .await?;

    Ok(Ajax(json!({ "key": request.key, "deleted": removed })))
}
