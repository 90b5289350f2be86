//! Signed tokens for sessions and nonces
//!
//! Both are HS256 JWTs signed with the same secret. A session identifies a
//! user; a nonce is an anti-forgery token bound to one user (or the anonymous
//! visitor) and one action.

use apollo_core::EntityId;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::AppError;

/// Token type enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    Session,
    Nonce,
}

/// Action a nonce authorizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NonceAction {
    Toggle,
    View,
    EditEvent,
    Admin,
}

impl NonceAction {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Toggle => "toggle",
            Self::View => "view",
            Self::EditEvent => "edit_event",
            Self::Admin => "admin",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "toggle" => Some(Self::Toggle),
            "view" => Some(Self::View),
            "edit_event" => Some(Self::EditEvent),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }
}

impl fmt::Display for NonceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID, "0" for anonymous nonces)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    pub token_type: TokenType,
    /// Set on nonces only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<NonceAction>,
}

impl Claims {
    /// Get the subject as an EntityId
    ///
    /// # Errors
    /// Returns an error if the subject is not an integer
    pub fn user_id(&self) -> Result<EntityId, AppError> {
        self.sub
            .parse::<i64>()
            .map(EntityId::new)
            .map_err(|_| AppError::InvalidToken)
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}

/// An issued session token
#[derive(Debug, Clone, Serialize)]
pub struct SessionToken {
    pub token: String,
    /// Lifetime in seconds
    pub expires_in: i64,
}

/// Issues and verifies session and nonce tokens
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    session_expiry: i64,
    nonce_expiry: i64,
}

impl JwtService {
    #[must_use]
    pub fn new(secret: &str, session_expiry: i64, nonce_expiry: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            session_expiry,
            nonce_expiry,
        }
    }

    #[must_use]
    pub fn session_expiry(&self) -> i64 {
        self.session_expiry
    }

    #[must_use]
    pub fn nonce_expiry(&self) -> i64 {
        self.nonce_expiry
    }

    /// Issue a session for a user
    ///
    /// # Errors
    /// Returns an error if token encoding fails
    pub fn issue_session(&self, user_id: EntityId) -> Result<SessionToken, AppError> {
        let token = self.encode_token(user_id, TokenType::Session, None)?;
        Ok(SessionToken {
            token,
            expires_in: self.session_expiry,
        })
    }

    /// Validate a session token and return the user it identifies
    ///
    /// # Errors
    /// `TokenExpired` for an expired session, `InvalidToken` for anything else
    pub fn validate_session(&self, token: &str) -> Result<EntityId, AppError> {
        let claims = self.decode_token(token)?;
        if claims.token_type != TokenType::Session {
            return Err(AppError::InvalidToken);
        }

        let user_id = claims.user_id()?;
        if user_id.is_anonymous() {
            return Err(AppError::InvalidToken);
        }
        Ok(user_id)
    }

    /// Issue a nonce bound to a user (or `EntityId::ANONYMOUS`) and an action
    ///
    /// # Errors
    /// Returns an error if token encoding fails
    pub fn issue_nonce(&self, user_id: EntityId, action: NonceAction) -> Result<String, AppError> {
        self.encode_token(user_id, TokenType::Nonce, Some(action))
    }

    /// Verify a nonce against the current user and the expected action
    ///
    /// # Errors
    /// Returns `AppError::InvalidNonce` on any mismatch, expiry or bad signature
    pub fn verify_nonce(
        &self,
        token: &str,
        user_id: EntityId,
        action: NonceAction,
    ) -> Result<(), AppError> {
        let claims = self.decode_token(token).map_err(|_| AppError::InvalidNonce)?;

        let bound_user = claims.user_id().map_err(|_| AppError::InvalidNonce)?;
        if claims.token_type != TokenType::Nonce
            || claims.action != Some(action)
            || bound_user != user_id
        {
            return Err(AppError::InvalidNonce);
        }
        Ok(())
    }

    fn encode_token(
        &self,
        user_id: EntityId,
        token_type: TokenType,
        action: Option<NonceAction>,
    ) -> Result<String, AppError> {
        let now = Utc::now();
        let expiry = match token_type {
            TokenType::Session => self.session_expiry,
            TokenType::Nonce => self.nonce_expiry,
        };

        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(expiry)).timestamp(),
            token_type,
            action,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to encode JWT: {e}")))
    }

    /// Decode and validate signature and expiry
    ///
    /// # Errors
    /// Returns an error if the token is invalid or expired
    pub fn decode_token(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::default();
        validation.leeway = 0;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::TokenExpired,
                _ => AppError::InvalidToken,
            }
        })?;

        Ok(token_data.claims)
    }
}

impl fmt::Debug for JwtService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtService")
            .field("session_expiry", &self.session_expiry)
            .field("nonce_expiry", &self.nonce_expiry)
            .finish_non_exhaustive()
    }
}
