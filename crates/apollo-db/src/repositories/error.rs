//! Error handling utilities for repositories

use apollo_core::error::DomainError;
use sqlx::Error as SqlxError;

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::StorageFailure(e.to_string())
}

/// Check for unique violation and return appropriate error or fallback
///
/// The callback receives the violated constraint name, if the driver reported one.
pub fn map_unique_violation<F>(e: SqlxError, on_unique: F) -> DomainError
where
    F: FnOnce(Option<&str>) -> DomainError,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return on_unique(db_err.constraint());
        }
    }
    DomainError::StorageFailure(e.to_string())
}

/// A referenced user or post vanished between the existence check and the write
pub fn map_foreign_key_violation(e: SqlxError, what: &str) -> DomainError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_foreign_key_violation() {
            return DomainError::InvalidReference(what.to_string());
        }
    }
    DomainError::StorageFailure(e.to_string())
}
