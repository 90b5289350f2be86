//! Capability checks shared by the services

use apollo_core::entities::{Post, User};
use apollo_core::Capabilities;
use tracing::debug;

use super::error::{ServiceError, ServiceResult};

/// Fail with `PermissionDenied` unless the user holds the capability
pub fn require_capability(user: &User, capability: Capabilities) -> ServiceResult<()> {
    if user.can(capability) {
        return Ok(());
    }
    debug!(user_id = %user.id, role = %user.role, required = %capability, "Capability check failed");
    Err(ServiceError::permission_denied(capability.to_string()))
}

/// Drafts are visible to editors only
pub fn can_view(viewer: Option<&User>, post: &Post) -> bool {
    post.is_published() || viewer.is_some_and(|u| u.can(Capabilities::EDIT_EVENTS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use apollo_core::entities::{NewPost, PostStatus, PostType, Role};
    use apollo_core::EntityId;
    use chrono::Utc;

    fn user(role: Role) -> User {
        User {
            id: EntityId::new(1),
            login: "u".into(),
            email: "u@example.com".into(),
            display_name: "u".into(),
            role,
            registered_at: Utc::now(),
        }
    }

    fn post(status: PostStatus) -> Post {
        let new = NewPost::event_listing("t", EntityId::new(1));
        Post {
            id: EntityId::new(1),
            post_type: PostType::EventListing,
            status,
            title: new.title,
            content: new.content,
            author_id: new.author_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_require_capability() {
        assert!(require_capability(&user(Role::Editor), Capabilities::EDIT_EVENTS).is_ok());
        let err = require_capability(&user(Role::Subscriber), Capabilities::EDIT_EVENTS)
            .unwrap_err();
        assert_eq!(err.error_code(), "forbidden");
        assert!(require_capability(&user(Role::Administrator), Capabilities::MANAGE_OPTIONS).is_ok());
    }

    #[test]
    fn test_drafts_hidden_from_readers() {
        let draft = post(PostStatus::Draft);
        assert!(!can_view(None, &draft));
        assert!(!can_view(Some(&user(Role::Subscriber)), &draft));
        assert!(can_view(Some(&user(Role::Editor)), &draft));
        assert!(can_view(None, &post(PostStatus::Publish)));
    }
}
