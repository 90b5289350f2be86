//! In-process implementation of PostRepository

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::instrument;

use apollo_core::entities::{NewPost, Post, PostType};
use apollo_core::error::DomainError;
use apollo_core::traits::{PostQuery, PostRepository, RepoResult};
use apollo_core::value_objects::EntityId;

use super::store::MemoryStore;

#[derive(Clone)]
pub struct MemoryPostRepository {
    store: Arc<MemoryStore>,
}

impl MemoryPostRepository {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl PostRepository for MemoryPostRepository {
    async fn find_by_id(&self, id: EntityId) -> RepoResult<Option<Post>> {
        Ok(self.store.posts.read().get(&id).cloned())
    }

    async fn list(&self, query: &PostQuery) -> RepoResult<Vec<Post>> {
        let posts = self.store.posts.read();
        let mut matching: Vec<&Post> = posts
            .values()
            .filter(|p| query.post_type.map_or(true, |t| p.post_type == t))
            .filter(|p| query.status.map_or(true, |s| p.status == s))
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(matching
            .into_iter()
            .skip(query.offset.max(0) as usize)
            .take(query.limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn ids_by_type(&self, post_type: PostType) -> RepoResult<Vec<EntityId>> {
        Ok(self
            .store
            .posts
            .read()
            .values()
            .filter(|p| p.post_type == post_type)
            .map(|p| p.id)
            .collect())
    }

    #[instrument(skip(self, post), fields(title = %post.title))]
    async fn create(&self, post: &NewPost) -> RepoResult<Post> {
        if !self.store.user_exists(post.author_id) {
            return Err(DomainError::InvalidReference("author does not exist".to_string()));
        }

        let now = Utc::now();
        let created = Post {
            id: self.store.next_post_id(),
            post_type: post.post_type,
            status: post.status,
            title: post.title.clone(),
            content: post.content.clone(),
            author_id: post.author_id,
            created_at: now,
            updated_at: now,
        };
        self.store.posts.write().insert(created.id, created.clone());

        Ok(created)
    }

    async fn update(&self, post: &Post) -> RepoResult<()> {
        let mut posts = self.store.posts.write();
        let stored = posts
            .get_mut(&post.id)
            .ok_or_else(|| DomainError::not_found(format!("post {}", post.id)))?;

        stored.title = post.title.clone();
        stored.content = post.content.clone();
        stored.status = post.status;
        stored.updated_at = post.updated_at;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: EntityId) -> RepoResult<bool> {
        if self.store.posts.write().remove(&id).is_none() {
            return Ok(false);
        }
        self.store.cascade_post(id);
        Ok(true)
    }
}
