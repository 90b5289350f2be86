//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and most implement `Validate`.
//! Mutating forms carry the anti-forgery `nonce`, which the HTTP layer checks
//! before any service call.

use apollo_core::EntityId;
use serde::Deserialize;
use validator::Validate;

// ============================================================================
// Auth Requests
// ============================================================================

/// Account registration form
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 60, message = "Login must be 3-60 characters"))]
    pub login: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,
}

/// Login form; `login` may also be an email address
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Login is required"))]
    pub login: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// `GET /ajax/nonce` query
#[derive(Debug, Clone, Deserialize)]
pub struct NonceQuery {
    pub action: String,
}

/// A form carrying nothing but the nonce
#[derive(Debug, Clone, Deserialize, Default)]
pub struct NonceForm {
    #[serde(default)]
    pub nonce: String,
}

// ============================================================================
// Engagement Requests
// ============================================================================

/// Toggle a favorite, bookmark or interest
#[derive(Debug, Clone, Deserialize)]
pub struct ToggleRequest {
    pub event_id: EntityId,
    #[serde(default)]
    pub nonce: String,
}

/// Record a page or popup view
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ViewRequest {
    pub event_id: EntityId,

    /// `page` (default) or `popup`
    #[validate(length(min = 1, max = 10))]
    pub kind: Option<String>,

    #[serde(default)]
    pub nonce: String,
}

// ============================================================================
// Event Listing Requests
// ============================================================================

/// Create an event listing
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateEventRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    #[validate(length(max = 100000, message = "Content must be at most 100000 characters"))]
    #[serde(default)]
    pub content: String,

    /// `event_listing` (default), `event_dj` or `event_local`
    pub post_type: Option<String>,

    /// `publish` (default) or `draft`
    pub status: Option<String>,

    #[serde(default)]
    pub nonce: String,
}

/// Partial update of an event listing
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateEventRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,

    #[validate(length(max = 100000, message = "Content must be at most 100000 characters"))]
    pub content: Option<String>,

    pub status: Option<String>,

    #[serde(default)]
    pub nonce: String,
}

/// `GET /events` query
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ListEventsQuery {
    pub post_type: Option<String>,
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Remove one meta key
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DeleteMetaRequest {
    #[validate(length(min = 1, message = "Key is required"))]
    pub key: String,

    #[serde(default)]
    pub nonce: String,
}

// ============================================================================
// Statistics Requests
// ============================================================================

/// `GET /dashboard/top-events` query
#[derive(Debug, Clone, Deserialize, Default)]
pub struct TopEventsQuery {
    pub limit: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_validation() {
        let ok = RegisterRequest {
            login: "dj_sam".into(),
            email: "sam@example.com".into(),
            password: "Secret123".into(),
        };
        assert!(ok.validate().is_ok());

        let bad = RegisterRequest {
            login: "ab".into(),
            email: "not-an-email".into(),
            password: "short".into(),
        };
        let errors = bad.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("login"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn test_update_event_allows_absent_fields() {
        let req = UpdateEventRequest {
            title: None,
            content: None,
            status: Some("draft".into()),
            nonce: String::new(),
        };
        assert!(req.validate().is_ok());

        let req = UpdateEventRequest {
            title: Some(String::new()),
            content: None,
            status: None,
            nonce: String::new(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_toggle_request_accepts_string_id() {
        let req: ToggleRequest =
            serde_json::from_str(r#"{"event_id": "42", "nonce": "n"}"#).unwrap();
        assert_eq!(req.event_id, EntityId::new(42));
    }
}
