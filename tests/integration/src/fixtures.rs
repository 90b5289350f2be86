//! Test fixtures and data generators
//!
//! Request forms and the response shapes the tests read back.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Registration form
#[derive(Debug, Clone, Serialize)]
pub struct RegisterForm {
    pub login: String,
    pub email: String,
    pub password: String,
}

impl RegisterForm {
    pub fn unique() -> Self {
        let suffix = unique_suffix();
        Self {
            login: format!("raver{suffix}"),
            email: format!("raver{suffix}@example.com"),
            password: "TestPass123".to_string(),
        }
    }
}

/// Login form
#[derive(Debug, Serialize)]
pub struct LoginForm {
    pub login: String,
    pub password: String,
}

impl LoginForm {
    pub fn from_register(reg: &RegisterForm) -> Self {
        Self {
            login: reg.login.clone(),
            password: reg.password.clone(),
        }
    }
}

/// `{success, data}`
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
}

/// Failure payload
#[derive(Debug, Deserialize)]
pub struct ErrorData {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct UserData {
    pub id: i64,
    pub login: String,
    pub email: String,
    pub role: String,
    pub capabilities: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct AuthData {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: UserData,
}

#[derive(Debug, Deserialize)]
pub struct NonceData {
    pub nonce: String,
    pub action: String,
}

#[derive(Debug, Deserialize)]
pub struct EventData {
    pub id: i64,
    pub post_type: String,
    pub status: String,
    pub title: String,
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct ToggleData {
    pub state: String,
    pub count: i64,
}

#[derive(Debug, Deserialize)]
pub struct RelationStatusData {
    pub kind: String,
    pub active: bool,
    pub count: i64,
}

#[derive(Debug, Deserialize)]
pub struct RelationListData {
    pub kind: String,
    pub events: Vec<EventData>,
}

#[derive(Debug, Deserialize)]
pub struct ViewSnapshotData {
    pub page_count: i64,
    pub popup_count: i64,
    pub total_count: i64,
}

#[derive(Debug, Deserialize)]
pub struct DailyViewsData {
    pub date: NaiveDate,
    pub page: i64,
    pub popup: i64,
    pub total: i64,
}

#[derive(Debug, Deserialize)]
pub struct ViewStatsData {
    pub object_id: i64,
    pub page_count: i64,
    pub popup_count: i64,
    pub total_count: i64,
    pub daily: Vec<DailyViewsData>,
}

#[derive(Debug, Deserialize)]
pub struct TopEventData {
    pub id: i64,
    pub title: String,
    pub total_count: i64,
}

#[derive(Debug, Deserialize)]
pub struct MetaData {
    pub post_id: i64,
    pub meta: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct RejectedMetaData {
    pub key: String,
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct MetaUpdateData {
    pub saved: Vec<String>,
    pub rejected: Vec<RejectedMetaData>,
}

#[derive(Debug, Deserialize)]
pub struct ReconcileData {
    pub events_scanned: usize,
    pub counters_changed: usize,
}
