//! Route handlers
//!
//! All HTTP request handlers organized by domain.

pub mod admin;
pub mod ajax;
pub mod auth;
pub mod events;
pub mod health;
pub mod meta;
pub mod stats;

use apollo_common::NonceAction;
use apollo_core::User;
use apollo_service::AuthService;

use crate::response::ApiResult;
use crate::state::AppState;

/// Reject the request unless `nonce` was issued to this visitor for `action`
pub(crate) fn require_nonce(
    state: &AppState,
    user: Option<&User>,
    nonce: &str,
    action: NonceAction,
) -> ApiResult<()> {
    AuthService::new(state.service_context()).verify_nonce(user, nonce, action)?;
    Ok(())
}
