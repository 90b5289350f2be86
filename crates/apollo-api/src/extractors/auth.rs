//! Authentication extractors
//!
//! Resolves the session from the `Authorization: Bearer` header or, failing
//! that, the `apollo_session` cookie, and loads the account it names.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    extract::CookieJar,
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use apollo_core::entities::User;
use apollo_service::AuthService;
use tracing::{debug, warn};

use crate::response::ApiError;
use crate::state::AppState;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "apollo_session";

/// The signed-in account; rejects with 401 `auth` when there is none
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

/// Bearer header first, then the session cookie
async fn session_token<S: Send + Sync>(parts: &mut Parts, state: &S) -> Option<String> {
    if let Ok(TypedHeader(Authorization(bearer))) =
        TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state).await
    {
        return Some(bearer.token().to_string());
    }

    CookieJar::from_headers(&parts.headers)
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty())
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = session_token(parts, state)
            .await
            .ok_or(ApiError::MissingAuth)?;

        let app_state = AppState::from_ref(state);
        let user = AuthService::new(app_state.service_context())
            .authenticate(&token)
            .await
            .map_err(|e| {
                warn!(error = %e, "Rejected session");
                ApiError::from(e)
            })?;

        Ok(AuthUser(user))
    }
}

/// The signed-in account, if any
///
/// An unusable session (expired, forged, deleted account) is treated as an
/// anonymous visitor rather than an error.
#[derive(Debug, Clone)]
pub struct OptionalAuthUser(pub Option<User>);

#[async_trait]
impl<S> FromRequestParts<S> for OptionalAuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Some(token) = session_token(parts, state).await else {
            return Ok(OptionalAuthUser(None));
        };

        let app_state = AppState::from_ref(state);
        match AuthService::new(app_state.service_context())
            .authenticate(&token)
            .await
        {
            Ok(user) => Ok(OptionalAuthUser(Some(user))),
            Err(e) => {
                debug!(error = %e, "Ignoring unusable session");
                Ok(OptionalAuthUser(None))
            }
        }
    }
}
