//! Entity to model mappers
//!
//! Conversions between domain entities (apollo-core) and database rows.
//! Rows holding enum values the domain does not know map to `StorageFailure`.

mod post;
mod user;
mod view_stat;

pub use post::posts_from_models;
pub use view_stat::view_stat_from_rows;
