//! Domain errors - error types for the domain layer

use thiserror::Error;

/// Domain layer errors
///
/// None of these are retried. `AuthRequired` and `ValidationFailed` are raised
/// before any mutation happens.
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Identity
    // =========================================================================
    #[error("Authentication required")]
    AuthRequired,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    // =========================================================================
    // Input
    // =========================================================================
    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Meta key not allowed: {0}")]
    InvalidKey(String),

    // =========================================================================
    // Lookup / uniqueness
    // =========================================================================
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    // =========================================================================
    // Infrastructure (wrapped)
    // =========================================================================
    #[error("Storage failure: {0}")]
    StorageFailure(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::AuthRequired => "auth",
            Self::Forbidden(_) => "forbidden",
            Self::InvalidReference(_) => "invalid_reference",
            Self::ValidationFailed(_) => "validation_failed",
            Self::InvalidKey(_) => "invalid_key",
            Self::NotFound(_) => "not_found",
            Self::Conflict(_) => "conflict",
            Self::StorageFailure(_) => "storage_failure",
            Self::InternalError(_) => "internal",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Errors caused by the request rather than the system
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::StorageFailure(_) | Self::InternalError(_))
    }

    pub fn not_found(what: impl std::fmt::Display) -> Self {
        Self::NotFound(what.to_string())
    }

    pub fn storage(err: impl std::fmt::Display) -> Self {
        Self::StorageFailure(err.to_string())
    }
}
