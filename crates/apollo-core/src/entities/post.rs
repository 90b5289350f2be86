//! Post entity - event listings and the related DJ and venue posts

use chrono::{DateTime, Utc};
use std::fmt;

use crate::value_objects::EntityId;

/// Post type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PostType {
    #[default]
    EventListing,
    EventDj,
    EventLocal,
}

impl PostType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::EventListing => "event_listing",
            Self::EventDj => "event_dj",
            Self::EventLocal => "event_local",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "event_listing" => Some(Self::EventListing),
            "event_dj" => Some(Self::EventDj),
            "event_local" => Some(Self::EventLocal),
            _ => None,
        }
    }
}

impl fmt::Display for PostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Publication status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PostStatus {
    #[default]
    Publish,
    Draft,
}

impl PostStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Publish => "publish",
            Self::Draft => "draft",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "publish" => Some(Self::Publish),
            "draft" => Some(Self::Draft),
            _ => None,
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Post entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: EntityId,
    pub post_type: PostType,
    pub status: PostStatus,
    pub title: String,
    pub content: String,
    pub author_id: EntityId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Only event listings can be favorited, bookmarked or viewed
    #[inline]
    pub fn is_event_listing(&self) -> bool {
        self.post_type == PostType::EventListing
    }

    #[inline]
    pub fn is_published(&self) -> bool {
        self.status == PostStatus::Publish
    }

    pub fn set_title(&mut self, title: String) {
        self.title = title;
        self.updated_at = Utc::now();
    }

    pub fn set_content(&mut self, content: String) {
        self.content = content;
        self.updated_at = Utc::now();
    }

    pub fn set_status(&mut self, status: PostStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }
}

/// Data for a post that has not been stored yet
#[derive(Debug, Clone)]
pub struct NewPost {
    pub post_type: PostType,
    pub status: PostStatus,
    pub title: String,
    pub content: String,
    pub author_id: EntityId,
}

impl NewPost {
    /// Published event listing
    pub fn event_listing(title: impl Into<String>, author_id: EntityId) -> Self {
        Self {
            post_type: PostType::EventListing,
            status: PostStatus::Publish,
            title: title.into(),
            content: String::new(),
            author_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_type_parse() {
        assert_eq!(PostType::parse("event_listing"), Some(PostType::EventListing));
        assert_eq!(PostType::parse("event_dj"), Some(PostType::EventDj));
        assert_eq!(PostType::parse("page"), None);
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(PostStatus::parse("draft"), Some(PostStatus::Draft));
        assert_eq!(PostStatus::parse("trash"), None);
    }

    #[test]
    fn test_setters_touch_updated_at() {
        let created = Utc::now() - chrono::Duration::hours(1);
        let mut post = Post {
            id: EntityId::new(1),
            post_type: PostType::EventLocal,
            status: PostStatus::Draft,
            title: "Old".to_string(),
            content: String::new(),
            author_id: EntityId::new(1),
            created_at: created,
            updated_at: created,
        };
        assert!(!post.is_event_listing());
        assert!(!post.is_published());

        post.set_status(PostStatus::Publish);
        assert!(post.is_published());
        assert!(post.updated_at > created);
    }
}
