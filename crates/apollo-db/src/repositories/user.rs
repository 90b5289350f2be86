//! PostgreSQL implementation of UserRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use apollo_core::entities::{NewUser, User};
use apollo_core::error::DomainError;
use apollo_core::traits::{RepoResult, UserRepository};
use apollo_core::value_objects::EntityId;

use crate::models::UserModel;

use super::error::{map_db_error, map_unique_violation};

/// Advisory lock key serializing self-registrations
const REGISTRATION_LOCK: i64 = 0x6170_6f6c_6c6f;

fn map_user_conflict(e: sqlx::Error) -> DomainError {
    map_unique_violation(e, |constraint| match constraint {
        Some(name) if name.contains("email") => {
            DomainError::Conflict("email already registered".to_string())
        }
        _ => DomainError::Conflict("login already taken".to_string()),
    })
}

/// PostgreSQL implementation of UserRepository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: EntityId) -> RepoResult<Option<User>> {
        let result = sqlx::query_as::<_, UserModel>(
            r"
            SELECT id, login, email, display_name, role, registered_at
            FROM users
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(User::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_login(&self, login: &str) -> RepoResult<Option<User>> {
        let result = sqlx::query_as::<_, UserModel>(
            r"
            SELECT id, login, email, display_name, role, registered_at
            FROM users
            WHERE login = $1
            ",
        )
        .bind(login)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(User::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let result = sqlx::query_as::<_, UserModel>(
            r"
            SELECT id, login, email, display_name, role, registered_at
            FROM users
            WHERE LOWER(email) = LOWER($1)
            ",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(User::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn count(&self) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }

    #[instrument(skip(self, password_hash), fields(login = %user.login))]
    async fn create(&self, user: &NewUser, password_hash: &str) -> RepoResult<User> {
        let model = sqlx::query_as::<_, UserModel>(
            r"
            INSERT INTO users (login, email, display_name, role, password_hash)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, login, email, display_name, role, registered_at
            ",
        )
        .bind(&user.login)
        .bind(&user.email)
        .bind(&user.display_name)
        .bind(user.role.as_str())
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(map_user_conflict)?;

        User::try_from(model)
    }

    #[instrument(skip(self, password_hash), fields(login = %user.login))]
    async fn register(&self, user: &NewUser, password_hash: &str) -> RepoResult<User> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // Held until commit; concurrent registrations see each other's rows
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(REGISTRATION_LOCK)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        let model = sqlx::query_as::<_, UserModel>(
            r"
            INSERT INTO users (login, email, display_name, role, password_hash)
            SELECT $1, $2, $3,
                   CASE WHEN EXISTS (SELECT 1 FROM users) THEN 'subscriber' ELSE 'administrator' END,
                   $4
            RETURNING id, login, email, display_name, role, registered_at
            ",
        )
        .bind(&user.login)
        .bind(&user.email)
        .bind(&user.display_name)
        .bind(password_hash)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_user_conflict)?;

        tx.commit().await.map_err(map_db_error)?;

        User::try_from(model)
    }

    #[instrument(skip(self))]
    async fn get_password_hash(&self, id: EntityId) -> RepoResult<Option<String>> {
        sqlx::query_scalar::<_, String>("SELECT password_hash FROM users WHERE id = $1")
            .bind(id.into_inner())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)
    }
}
