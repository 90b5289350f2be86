//! Fixtures for service unit tests

use std::sync::Arc;

use apollo_common::JwtService;
use apollo_core::entities::{NewPost, NewUser, Post, PostType, Role, User};
use apollo_db::MemoryStore;

use super::context::{ServiceContext, ServiceContextBuilder};

/// Context over a fresh in-process store
pub fn memory_context() -> ServiceContext {
    ServiceContextBuilder::new()
        .memory(Arc::new(MemoryStore::new()))
        .jwt_service(Arc::new(JwtService::new("test-secret", 3600, 3600)))
        .build()
        .expect("memory context")
}

pub async fn seed_user(ctx: &ServiceContext, login: &str, role: Role) -> User {
    let new = NewUser::new(login.to_string(), format!("{login}@example.com")).with_role(role);
    ctx.user_repo()
        .create(&new, "not-a-real-hash")
        .await
        .expect("seed user")
}

/// Published event listing
pub async fn seed_event(ctx: &ServiceContext, author: &User, title: &str) -> Post {
    ctx.post_repo()
        .create(&NewPost::event_listing(title, author.id))
        .await
        .expect("seed event")
}

pub async fn seed_post_of_type(ctx: &ServiceContext, author: &User, post_type: PostType) -> Post {
    let mut new = NewPost::event_listing("Resident", author.id);
    new.post_type = post_type;
    ctx.post_repo().create(&new).await.expect("seed post")
}
