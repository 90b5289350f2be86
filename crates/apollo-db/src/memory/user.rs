//! In-process implementation of UserRepository

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::instrument;

use apollo_core::entities::{NewUser, Role, User};
use apollo_core::error::DomainError;
use apollo_core::traits::{RepoResult, UserRepository};
use apollo_core::value_objects::EntityId;

use super::store::{MemoryStore, UserRecord};

#[derive(Clone)]
pub struct MemoryUserRepository {
    store: Arc<MemoryStore>,
}

impl MemoryUserRepository {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_by_id(&self, id: EntityId) -> RepoResult<Option<User>> {
        Ok(self.store.users.read().get(&id).map(|r| r.user.clone()))
    }

    async fn find_by_login(&self, login: &str) -> RepoResult<Option<User>> {
        Ok(self
            .store
            .users
            .read()
            .values()
            .find(|r| r.user.login == login)
            .map(|r| r.user.clone()))
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        Ok(self
            .store
            .users
            .read()
            .values()
            .find(|r| r.user.email.eq_ignore_ascii_case(email))
            .map(|r| r.user.clone()))
    }

    async fn count(&self) -> RepoResult<i64> {
        Ok(self.store.users.read().len() as i64)
    }

    #[instrument(skip(self, user, password_hash), fields(login = %user.login))]
    async fn create(&self, user: &NewUser, password_hash: &str) -> RepoResult<User> {
        self.insert(user, password_hash, false)
    }

    #[instrument(skip(self, user, password_hash), fields(login = %user.login))]
    async fn register(&self, user: &NewUser, password_hash: &str) -> RepoResult<User> {
        self.insert(user, password_hash, true)
    }

    async fn get_password_hash(&self, id: EntityId) -> RepoResult<Option<String>> {
        Ok(self
            .store
            .users
            .read()
            .get(&id)
            .map(|r| r.password_hash.clone()))
    }
}

impl MemoryUserRepository {
    /// Insert under the write lock so the emptiness check and the insert are one step
    fn insert(&self, user: &NewUser, password_hash: &str, self_registered: bool) -> RepoResult<User> {
        let mut users = self.store.users.write();

        let role = match (self_registered, users.is_empty()) {
            (true, true) => Role::Administrator,
            (true, false) => Role::Subscriber,
            (false, _) => user.role,
        };

        for existing in users.values() {
            if existing.user.login == user.login {
                return Err(DomainError::Conflict("login already taken".to_string()));
            }
            if existing.user.email.eq_ignore_ascii_case(&user.email) {
                return Err(DomainError::Conflict("email already registered".to_string()));
            }
        }

        let created = User {
            id: self.store.next_user_id(),
            login: user.login.clone(),
            email: user.email.clone(),
            display_name: user.display_name.clone(),
            role,
            registered_at: Utc::now(),
        };
        users.insert(
            created.id,
            UserRecord {
                user: created.clone(),
                password_hash: password_hash.to_string(),
            },
        );

        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo() -> MemoryUserRepository {
        MemoryUserRepository::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repo = repo();
        let user = repo
            .create(&NewUser::new("alice".into(), "Alice@Example.com".into()), "hash")
            .await
            .unwrap();

        assert_eq!(user.id, EntityId::new(1));
        assert_eq!(user.role, Role::Subscriber);
        assert_eq!(repo.count().await.unwrap(), 1);
        assert!(repo.find_by_login("alice").await.unwrap().is_some());
        assert!(repo.find_by_email("alice@example.com").await.unwrap().is_some());
        assert_eq!(
            repo.get_password_hash(user.id).await.unwrap().as_deref(),
            Some("hash")
        );
    }

    #[tokio::test]
    async fn test_duplicates_conflict() {
        let repo = repo();
        repo.create(&NewUser::new("alice".into(), "a@example.com".into()), "h")
            .await
            .unwrap();

        let login = repo
            .create(&NewUser::new("alice".into(), "b@example.com".into()), "h")
            .await
            .unwrap_err();
        assert!(matches!(login, DomainError::Conflict(ref m) if m.contains("login")));

        let email = repo
            .create(&NewUser::new("bob".into(), "A@EXAMPLE.COM".into()), "h")
            .await
            .unwrap_err();
        assert!(matches!(email, DomainError::Conflict(ref m) if m.contains("email")));
    }

    #[tokio::test]
    async fn test_register_promotes_only_the_first_account() {
        let repo = repo();
        let first = repo
            .register(
                &NewUser::new("alice".into(), "a@example.com".into()).with_role(Role::Editor),
                "h",
            )
            .await
            .unwrap();
        let second = repo
            .register(
                &NewUser::new("bob".into(), "b@example.com".into()).with_role(Role::Administrator),
                "h",
            )
            .await
            .unwrap();

        assert_eq!(first.role, Role::Administrator);
        assert_eq!(second.role, Role::Subscriber);
    }

    #[tokio::test]
    async fn test_concurrent_first_registrations_yield_one_administrator() {
        for _ in 0..20 {
            let repo = repo();
            let mut handles = Vec::new();
            for i in 0..8 {
                let repo = repo.clone();
                handles.push(tokio::spawn(async move {
                    repo.register(
                        &NewUser::new(format!("user{i}"), format!("user{i}@example.com")),
                        "h",
                    )
                    .await
                }));
            }

            let mut admins = 0;
            for handle in handles {
                if handle.await.unwrap().unwrap().role == Role::Administrator {
                    admins += 1;
                }
            }
            assert_eq!(admins, 1);
        }
    }
}
