//! User entity <-> model mapper

use apollo_core::entities::{Role, User};
use apollo_core::error::DomainError;
use apollo_core::value_objects::EntityId;

use crate::models::UserModel;

/// Convert UserModel to User entity
///
/// Fails if the stored role is not one the domain knows about.
impl TryFrom<UserModel> for User {
    type Error = DomainError;

    fn try_from(model: UserModel) -> Result<Self, Self::Error> {
        let role = Role::parse(&model.role).ok_or_else(|| {
            DomainError::StorageFailure(format!("user {} has unknown role {}", model.id, model.role))
        })?;

        Ok(User {
            id: EntityId::new(model.id),
            login: model.login,
            email: model.email,
            display_name: model.display_name,
            role,
            registered_at: model.registered_at,
        })
    }
}
