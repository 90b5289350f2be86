//! In-process storage backend
//!
//! Implements every repository trait over a single shared [`MemoryStore`].
//! Used by tests and by `DATABASE_BACKEND=memory` deployments; nothing
//! survives a restart.

mod meta;
mod post;
mod relation;
mod store;
mod user;
mod view_stat;

pub use meta::MemoryMetaRepository;
pub use post::MemoryPostRepository;
pub use relation::MemoryRelationRepository;
pub use store::MemoryStore;
pub use user::MemoryUserRepository;
pub use view_stat::MemoryViewStatRepository;
