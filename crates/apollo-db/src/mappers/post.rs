//! Post entity <-> model mapper

use apollo_core::entities::{Post, PostStatus, PostType};
use apollo_core::error::DomainError;
use apollo_core::value_objects::EntityId;

use crate::models::PostModel;

/// Convert PostModel to Post entity
impl TryFrom<PostModel> for Post {
    type Error = DomainError;

    fn try_from(model: PostModel) -> Result<Self, Self::Error> {
        let post_type = PostType::parse(&model.post_type).ok_or_else(|| {
            DomainError::StorageFailure(format!(
                "post {} has unknown type {}",
                model.id, model.post_type
            ))
        })?;
        let status = PostStatus::parse(&model.status).ok_or_else(|| {
            DomainError::StorageFailure(format!(
                "post {} has unknown status {}",
                model.id, model.status
            ))
        })?;

        Ok(Post {
            id: EntityId::new(model.id),
            post_type,
            status,
            title: model.title,
            content: model.content,
            author_id: EntityId::new(model.author_id),
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

/// Map a list of rows, failing on the first bad row
pub fn posts_from_models(models: Vec<PostModel>) -> Result<Vec<Post>, DomainError> {
    models.into_iter().map(Post::try_from).collect()
}
