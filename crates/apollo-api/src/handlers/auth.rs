//! Authentication handlers
//!
//! Endpoints for registration, login, logout and the current account. The
//! session token is returned in the body and set as an HttpOnly cookie.

use axum::extract::State;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use apollo_service::dto::{AuthResponse, LoginRequest, RegisterRequest, UserResponse};
use apollo_service::AuthService;
use serde_json::{json, Value};

use crate::extractors::{AuthUser, ValidatedForm, SESSION_COOKIE};
use crate::response::{Ajax, ApiResult, Created};
use crate::state::AppState;

fn session_cookie(state: &AppState, token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.secure_cookies())
        .build()
}

/// Register a new account and open a session
///
/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedForm(request): ValidatedForm<RegisterRequest>,
) -> ApiResult<Created<(CookieJar, Ajax<AuthResponse>)>> {
    let service = AuthService::new(state.service_context());
    let response = service.register(request).await?;
    let jar = jar.add(session_cookie(&state, response.token.clone()));
    Ok(Created((jar, Ajax(response))))
}

/// Login with login name or email and password
///
/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedForm(request): ValidatedForm<LoginRequest>,
) -> ApiResult<(CookieJar, Ajax<AuthResponse>)> {
    let service = AuthService::new(state.service_context());
    let response = service.login(request).await?;
    let jar = jar.add(session_cookie(&state, response.token.clone()));
    Ok((jar, Ajax(response)))
}

/// Clear the session cookie
///
/// POST /auth/logout
pub async fn logout(jar: CookieJar) -> (CookieJar, Ajax<Value>) {
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    (jar, Ajax(json!({ "logged_out": true })))
}

/// The signed-in account
///
/// GET /auth/me
pub async fn me(AuthUser(user): AuthUser) -> Ajax<UserResponse> {
    Ajax(UserResponse::from(&user))
}
