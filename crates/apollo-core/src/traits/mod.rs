//! Ports implemented by the infrastructure crates

mod repositories;
mod subscriber;

pub use repositories::{
    InsertOutcome, MetaRepository, PostQuery, PostRepository, RelationRepository, RepoResult,
    UserRepository, ViewStatRepository,
};
pub use subscriber::EventSubscriber;
