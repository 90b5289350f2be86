//! Authentication service
//!
//! Handles registration, login, session validation and nonce issuance.

use apollo_common::{AppError, NonceAction};
use apollo_core::entities::{NewUser, User};
use apollo_core::events::UserRegisteredEvent;
use apollo_core::{DomainEvent, EntityId};
use tracing::{info, instrument, warn};

use crate::dto::{AuthResponse, LoginRequest, NonceResponse, RegisterRequest};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Authentication service
pub struct AuthService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuthService<'a> {
    /// Create a new AuthService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Register a new account and open a session for it
    ///
    /// The first account ever registered becomes the administrator.
    #[instrument(skip(self, request), fields(login = %request.login, email = %request.email))]
    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<AuthResponse> {
        let login = request.login.trim().to_string();
        let email = request.email.trim().to_string();

        // Password policy before touching storage
        let password_hash = self.ctx.password_service().hash_new(&request.password)?;

        if self.ctx.user_repo().find_by_login(&login).await?.is_some() {
            return Err(ServiceError::conflict("login already taken"));
        }
        if self.ctx.user_repo().find_by_email(&email).await?.is_some() {
            return Err(ServiceError::conflict("email already registered"));
        }

        // The store re-checks uniqueness and picks the role atomically
        let user = self
            .ctx
            .user_repo()
            .register(&NewUser::new(login, email), &password_hash)
            .await?;

        info!(user_id = %user.id, role = %user.role, "User registered");

        self.ctx
            .event_bus()
            .publish(DomainEvent::UserRegistered(UserRegisteredEvent::new(user.id)))
            .await;

        self.open_session(&user)
    }

    /// Login with login name or email and password
    #[instrument(skip(self, request), fields(login = %request.login))]
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<AuthResponse> {
        let identifier = request.login.trim();
        let user = if identifier.contains('@') {
            self.ctx.user_repo().find_by_email(identifier).await?
        } else {
            self.ctx.user_repo().find_by_login(identifier).await?
        };

        let user = user.ok_or_else(|| {
            warn!("Login failed: unknown account");
            ServiceError::App(AppError::InvalidCredentials)
        })?;

        let password_hash = self
            .ctx
            .user_repo()
            .get_password_hash(user.id)
            .await?
            .ok_or_else(|| {
                warn!(user_id = %user.id, "Login failed: no password hash");
                ServiceError::App(AppError::InvalidCredentials)
            })?;

        self.ctx
            .password_service()
            .verify_or_error(&request.password, &password_hash)
            .inspect_err(|_| warn!(user_id = %user.id, "Login failed: invalid password"))?;

        info!(user_id = %user.id, "User logged in");
        self.open_session(&user)
    }

    /// Resolve a session token to its account
    ///
    /// A valid token whose account no longer exists is treated as invalid.
    #[instrument(skip(self, token))]
    pub async fn authenticate(&self, token: &str) -> ServiceResult<User> {
        let user_id = self.ctx.jwt_service().validate_session(token)?;

        self.ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or(ServiceError::App(AppError::InvalidToken))
    }

    /// Issue a nonce for the current user, or for anonymous visitors
    pub fn issue_nonce(
        &self,
        user: Option<&User>,
        action: NonceAction,
    ) -> ServiceResult<NonceResponse> {
        let user_id = user.map_or(EntityId::ANONYMOUS, |u| u.id);
        let nonce = self.ctx.jwt_service().issue_nonce(user_id, action)?;

        Ok(NonceResponse {
            nonce,
            action: action.as_str(),
            expires_in: self.ctx.jwt_service().nonce_expiry(),
        })
    }

    /// Check a submitted nonce against the current user and action
    pub fn verify_nonce(
        &self,
        user: Option<&User>,
        nonce: &str,
        action: NonceAction,
    ) -> ServiceResult<()> {
        let user_id = user.map_or(EntityId::ANONYMOUS, |u| u.id);
        self.ctx
            .jwt_service()
            .verify_nonce(nonce, user_id, action)
            .map_err(|e| {
                warn!(user_id = %user_id, action = %action, "Nonce rejected");
                ServiceError::from(e)
            })
    }

    fn open_session(&self, user: &User) -> ServiceResult<AuthResponse> {
        let session = self.ctx.jwt_service().issue_session(user.id)?;
        Ok(AuthResponse::new(session.token, session.expires_in, user))
    }
}
