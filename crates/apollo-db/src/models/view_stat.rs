//! View statistics database models

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

/// Aggregate row of event_view_stats
#[derive(Debug, Clone, FromRow)]
pub struct ViewStatModel {
    pub object_id: i64,
    pub page_count: i64,
    pub popup_count: i64,
    pub total_count: i64,
    pub last_viewed_at: Option<DateTime<Utc>>,
}

/// One day of event_view_daily
#[derive(Debug, Clone, FromRow)]
pub struct DailyViewModel {
    pub day: NaiveDate,
    pub page: i64,
    pub popup: i64,
    pub total: i64,
}
