//! Data transfer objects for API requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for API inputs
//! - Response DTOs for serializing API outputs

pub mod requests;
pub mod responses;

// Re-export commonly used request types
pub use requests::{
    CreateEventRequest, DeleteMetaRequest, ListEventsQuery, LoginRequest, NonceForm, NonceQuery,
    RegisterRequest, ToggleRequest, TopEventsQuery, UpdateEventRequest, ViewRequest,
};

// Re-export commonly used response types
pub use responses::{
    AuthResponse, DailyViewsResponse, EventResponse, HealthChecks, HealthResponse,
    MetaResponse, MetaUpdateResponse, NonceResponse, ReadinessResponse, ReconcileResponse,
    RejectedMeta, RelationListResponse, RelationStatusResponse, ToggleResponse,
    TopEventResponse, UserResponse, ViewSnapshotResponse, ViewStatsResponse,
};
