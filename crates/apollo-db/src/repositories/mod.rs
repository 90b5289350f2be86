//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in apollo-core.
//! Each repository handles database operations for a specific domain entity.

mod error;
mod meta;
mod post;
mod relation;
mod user;
mod view_stat;

pub use meta::PgMetaRepository;
pub use post::PgPostRepository;
pub use relation::PgRelationRepository;
pub use user::PgUserRepository;
pub use view_stat::PgViewStatRepository;
