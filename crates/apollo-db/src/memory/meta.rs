//! In-process implementation of MetaRepository

use std::sync::Arc;

use async_trait::async_trait;

use apollo_core::error::DomainError;
use apollo_core::traits::{MetaRepository, RepoResult};
use apollo_core::value_objects::{EntityId, MetaKey};

use super::store::MemoryStore;

#[derive(Clone)]
pub struct MemoryMetaRepository {
    store: Arc<MemoryStore>,
}

impl MemoryMetaRepository {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl MetaRepository for MemoryMetaRepository {
    async fn get(&self, post_id: EntityId, key: MetaKey) -> RepoResult<Option<String>> {
        Ok(self.store.meta.get(&(post_id, key)).map(|v| v.value().clone()))
    }

    async fn get_all(&self, post_id: EntityId) -> RepoResult<Vec<(MetaKey, String)>> {
        let mut entries: Vec<(MetaKey, String)> = self
            .store
            .meta
            .iter()
            .filter(|entry| entry.key().0 == post_id)
            .map(|entry| (entry.key().1, entry.value().clone()))
            .collect();
        entries.sort_by_key(|(key, _)| *key);
        Ok(entries)
    }

    async fn set(&self, post_id: EntityId, key: MetaKey, value: &str) -> RepoResult<()> {
        if !self.store.post_exists(post_id) {
            return Err(DomainError::InvalidReference("post does not exist".to_string()));
        }
        self.store.meta.insert((post_id, key), value.to_string());
        Ok(())
    }

    async fn delete(&self, post_id: EntityId, key: MetaKey) -> RepoResult<bool> {
        Ok(self.store.meta.remove(&(post_id, key)).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apollo_core::entities::{NewPost, NewUser};
    use apollo_core::traits::{PostRepository, UserRepository};

    use crate::memory::{MemoryPostRepository, MemoryUserRepository};

    async fn setup() -> (Arc<MemoryStore>, EntityId) {
        let store = Arc::new(MemoryStore::new());
        let author = MemoryUserRepository::new(store.clone())
            .create(&NewUser::new("author".into(), "author@example.com".into()), "h")
            .await
            .unwrap();
        let post = MemoryPostRepository::new(store.clone())
            .create(&NewPost::event_listing("Gig", author.id))
            .await
            .unwrap();
        (store, post.id)
    }

    #[tokio::test]
    async fn test_set_get_overwrite() {
        let (store, post) = setup().await;
        let repo = MemoryMetaRepository::new(store);

        repo.set(post, MetaKey::EventLocation, "Hall").await.unwrap();
        repo.set(post, MetaKey::EventLocation, "Club").await.unwrap();
        assert_eq!(
            repo.get(post, MetaKey::EventLocation).await.unwrap().as_deref(),
            Some("Club")
        );
        assert!(repo.get(post, MetaKey::TicketsExt).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_all_in_key_order() {
        let (store, post) = setup().await;
        let repo = MemoryMetaRepository::new(store);

        repo.set(post, MetaKey::TicketsExt, "https://example.com").await.unwrap();
        repo.set(post, MetaKey::EventLocation, "Hall").await.unwrap();
        let keys: Vec<_> = repo.get_all(post).await.unwrap().into_iter().map(|(k, _)| k).collect();

        let mut expected = keys.clone();
        expected.sort();
        assert_eq!(keys, expected);
        assert_eq!(keys.len(), 2);
    }

    #[tokio::test]
    async fn test_set_unknown_post_rejected() {
        let (store, _) = setup().await;
        let repo = MemoryMetaRepository::new(store);
        let err = repo.set(EntityId::new(404), MetaKey::EventLocation, "x").await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidReference(_)));
    }

    #[tokio::test]
    async fn test_post_delete_cascades() {
        let (store, post) = setup().await;
        let repo = MemoryMetaRepository::new(store.clone());
        repo.set(post, MetaKey::EventLocation, "Hall").await.unwrap();

        MemoryPostRepository::new(store).delete(post).await.unwrap();
        assert!(repo.get_all(post).await.unwrap().is_empty());
        assert!(!repo.delete(post, MetaKey::EventLocation).await.unwrap());
    }
}
