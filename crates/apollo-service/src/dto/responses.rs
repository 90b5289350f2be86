//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output. The HTTP layer
//! places them in the `data` field of the `{success, data}` envelope.

use std::collections::BTreeMap;

use apollo_core::entities::{
    DailyViews, Post, RelationKind, StatsSnapshot, ToggleOutcome, User, ViewStat,
};
use apollo_core::{EntityId, MetaValue};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

// ============================================================================
// Auth Responses
// ============================================================================

/// The signed-in account
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: EntityId,
    pub login: String,
    pub email: String,
    pub display_name: String,
    pub role: &'static str,
    pub capabilities: Vec<&'static str>,
    pub registered_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            login: user.login.clone(),
            email: user.email.clone(),
            display_name: user.display_name.clone(),
            role: user.role.as_str(),
            capabilities: user.capabilities().names(),
            registered_at: user.registered_at,
        }
    }
}

/// Session issued by register or login
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
    pub user: UserResponse,
}

impl AuthResponse {
    pub fn new(token: String, expires_in: i64, user: &User) -> Self {
        Self {
            token,
            token_type: "Bearer",
            expires_in,
            user: UserResponse::from(user),
        }
    }
}

/// A freshly issued nonce
#[derive(Debug, Clone, Serialize)]
pub struct NonceResponse {
    pub nonce: String,
    pub action: &'static str,
    pub expires_in: i64,
}

// ============================================================================
// Engagement Responses
// ============================================================================

/// Result of a toggle
#[derive(Debug, Clone, Serialize)]
pub struct ToggleResponse {
    pub state: &'static str,
    pub count: i64,
}

impl From<ToggleOutcome> for ToggleResponse {
    fn from(outcome: ToggleOutcome) -> Self {
        Self {
            state: outcome.state.as_str(),
            count: outcome.count,
        }
    }
}

/// Button state for one relation kind
#[derive(Debug, Clone, Serialize)]
pub struct RelationStatusResponse {
    pub kind: RelationKind,
    pub active: bool,
    pub count: i64,
}

/// A user's related events, newest first
#[derive(Debug, Clone, Serialize)]
pub struct RelationListResponse {
    pub kind: RelationKind,
    pub events: Vec<EventResponse>,
}

/// Outcome of the counter repair job
#[derive(Debug, Clone, Serialize)]
pub struct ReconcileResponse {
    pub events_scanned: usize,
    pub counters_changed: usize,
}

// ============================================================================
// Event Listing Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct EventResponse {
    pub id: EntityId,
    pub post_type: &'static str,
    pub status: &'static str,
    pub title: String,
    pub content: String,
    pub author_id: EntityId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Post> for EventResponse {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id,
            post_type: post.post_type.as_str(),
            status: post.status.as_str(),
            title: post.title.clone(),
            content: post.content.clone(),
            author_id: post.author_id,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

/// Sanitized meta of one post, keyed by stored key name
#[derive(Debug, Clone, Serialize)]
pub struct MetaResponse {
    pub post_id: EntityId,
    pub meta: BTreeMap<&'static str, MetaValue>,
}

/// A meta key the update refused
#[derive(Debug, Clone, Serialize)]
pub struct RejectedMeta {
    pub key: String,
    pub code: &'static str,
    pub message: String,
}

/// Per-key outcome of a meta update
#[derive(Debug, Clone, Serialize, Default)]
pub struct MetaUpdateResponse {
    pub saved: Vec<&'static str>,
    pub rejected: Vec<RejectedMeta>,
}

// ============================================================================
// Statistics Responses
// ============================================================================

/// Lifetime view counters of one event
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ViewSnapshotResponse {
    pub page_count: i64,
    pub popup_count: i64,
    pub total_count: i64,
    pub last_viewed_at: Option<DateTime<Utc>>,
}

impl From<StatsSnapshot> for ViewSnapshotResponse {
    fn from(s: StatsSnapshot) -> Self {
        Self {
            page_count: s.page_count,
            popup_count: s.popup_count,
            total_count: s.total_count,
            last_viewed_at: s.last_viewed_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DailyViewsResponse {
    pub date: NaiveDate,
    pub page: i64,
    pub popup: i64,
    pub total: i64,
}

impl DailyViewsResponse {
    fn new(date: NaiveDate, views: &DailyViews) -> Self {
        Self {
            date,
            page: views.page,
            popup: views.popup,
            total: views.total,
        }
    }
}

/// Counters plus the daily series, oldest day first
#[derive(Debug, Clone, Serialize)]
pub struct ViewStatsResponse {
    pub object_id: EntityId,
    #[serde(flatten)]
    pub snapshot: ViewSnapshotResponse,
    pub daily: Vec<DailyViewsResponse>,
}

impl From<&ViewStat> for ViewStatsResponse {
    fn from(stat: &ViewStat) -> Self {
        Self {
            object_id: stat.object_id,
            snapshot: stat.snapshot().into(),
            daily: stat
                .daily
                .iter()
                .map(|(date, views)| DailyViewsResponse::new(*date, views))
                .collect(),
        }
    }
}

/// One row of the most-viewed widget
#[derive(Debug, Clone, Serialize)]
pub struct TopEventResponse {
    pub id: EntityId,
    pub title: String,
    #[serde(flatten)]
    pub snapshot: ViewSnapshotResponse,
}

// ============================================================================
// Health Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

/// Readiness with one entry per dependency
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: &'static str,
    pub checks: HealthChecks,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub storage: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redis: Option<&'static str>,
}

impl ReadinessResponse {
    pub fn new(checks: HealthChecks) -> Self {
        let healthy = checks.storage == "ok" && checks.redis.map_or(true, |r| r == "ok");
        Self {
            status: if healthy { "ready" } else { "degraded" },
            checks,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apollo_core::entities::{ToggleState, ViewKind};

    #[test]
    fn test_toggle_response_shape() {
        let json = serde_json::to_value(ToggleResponse::from(ToggleOutcome {
            state: ToggleState::Added,
            count: 1,
        }))
        .unwrap();
        assert_eq!(json, serde_json::json!({"state": "added", "count": 1}));
    }

    #[test]
    fn test_view_stats_flattened() {
        let mut stat = ViewStat::new(EntityId::new(5));
        let day = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        stat.record(ViewKind::Page, day, Utc::now());

        let json = serde_json::to_value(ViewStatsResponse::from(&stat)).unwrap();
        assert_eq!(json["object_id"], 5);
        assert_eq!(json["total_count"], 1);
        assert_eq!(json["daily"][0]["date"], "2025-06-01");
        assert_eq!(json["daily"][0]["page"], 1);
    }

    #[test]
    fn test_readiness() {
        let ready = ReadinessResponse::new(HealthChecks { storage: "ok", redis: None });
        assert!(ready.is_ready());

        let degraded = ReadinessResponse::new(HealthChecks {
            storage: "ok",
            redis: Some("unavailable"),
        });
        assert!(!degraded.is_ready());
    }
}
