//! Embedded PostgreSQL schema

use sqlx::PgPool;
use tracing::info;

/// Schema SQL embedded at compile time
pub const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Create any missing tables and indexes
pub async fn apply_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(SCHEMA_SQL).execute(pool).await?;
    info!("Database schema applied");
    Ok(())
}
