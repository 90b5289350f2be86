//! Post meta database model

use sqlx::FromRow;

/// One row of the post_meta table
#[derive(Debug, Clone, FromRow)]
pub struct MetaModel {
    pub meta_key: String,
    pub meta_value: String,
}
