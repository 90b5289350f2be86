//! PostgreSQL implementation of PostRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use apollo_core::entities::{NewPost, Post, PostType};
use apollo_core::error::DomainError;
use apollo_core::traits::{PostQuery, PostRepository, RepoResult};
use apollo_core::value_objects::EntityId;

use crate::mappers::posts_from_models;
use crate::models::PostModel;

use super::error::{map_db_error, map_foreign_key_violation};

/// PostgreSQL implementation of PostRepository
#[derive(Clone)]
pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: EntityId) -> RepoResult<Option<Post>> {
        let result = sqlx::query_as::<_, PostModel>(
            r"
            SELECT id, post_type, status, title, content, author_id, created_at, updated_at
            FROM posts
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Post::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn list(&self, query: &PostQuery) -> RepoResult<Vec<Post>> {
        let results = sqlx::query_as::<_, PostModel>(
            r"
            SELECT id, post_type, status, title, content, author_id, created_at, updated_at
            FROM posts
            WHERE ($1::TEXT IS NULL OR post_type = $1)
              AND ($2::TEXT IS NULL OR status = $2)
            ORDER BY created_at DESC, id DESC
            LIMIT $3 OFFSET $4
            ",
        )
        .bind(query.post_type.map(|t| t.as_str()))
        .bind(query.status.map(|s| s.as_str()))
        .bind(query.limit)
        .bind(query.offset)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        posts_from_models(results)
    }

    #[instrument(skip(self))]
    async fn ids_by_type(&self, post_type: PostType) -> RepoResult<Vec<EntityId>> {
        let ids = sqlx::query_scalar::<_, i64>(
            "SELECT id FROM posts WHERE post_type = $1 ORDER BY id",
        )
        .bind(post_type.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(ids.into_iter().map(EntityId::new).collect())
    }

    #[instrument(skip(self, post), fields(title = %post.title))]
    async fn create(&self, post: &NewPost) -> RepoResult<Post> {
        let model = sqlx::query_as::<_, PostModel>(
            r"
            INSERT INTO posts (post_type, status, title, content, author_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, post_type, status, title, content, author_id, created_at, updated_at
            ",
        )
        .bind(post.post_type.as_str())
        .bind(post.status.as_str())
        .bind(&post.title)
        .bind(&post.content)
        .bind(post.author_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_foreign_key_violation(e, "author does not exist"))?;

        Post::try_from(model)
    }

    #[instrument(skip(self, post), fields(post_id = %post.id))]
    async fn update(&self, post: &Post) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE posts
            SET title = $2, content = $3, status = $4, updated_at = $5
            WHERE id = $1
            ",
        )
        .bind(post.id.into_inner())
        .bind(&post.title)
        .bind(&post.content)
        .bind(post.status.as_str())
        .bind(post.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!("post {}", post.id)));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: EntityId) -> RepoResult<bool> {
        // meta, relations and view stats go with it via ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }
}
