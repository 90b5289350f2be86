//! Post database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for the posts table
#[derive(Debug, Clone, FromRow)]
pub struct PostModel {
    pub id: i64,
    pub post_type: String,
    pub status: String,
    pub title: String,
    pub content: String,
    pub author_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
