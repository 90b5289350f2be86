//! User database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for the users table (password hash excluded)
#[derive(Debug, Clone, FromRow)]
pub struct UserModel {
    pub id: i64,
    pub login: String,
    pub email: String,
    pub display_name: String,
    pub role: String,
    pub registered_at: DateTime<Utc>,
}
