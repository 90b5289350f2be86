//! Engagement relation - a user marking an event as favorite, bookmark or interest

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value_objects::{EntityId, MetaKey};

/// Kind of engagement relation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationKind {
    Favorite,
    Bookmark,
    Interest,
}

impl RelationKind {
    pub const ALL: [RelationKind; 3] = [Self::Favorite, Self::Bookmark, Self::Interest];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Favorite => "favorite",
            Self::Bookmark => "bookmark",
            Self::Interest => "interest",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "favorite" => Some(Self::Favorite),
            "bookmark" => Some(Self::Bookmark),
            "interest" => Some(Self::Interest),
            _ => None,
        }
    }

    /// Meta key holding the denormalized count for this kind
    pub const fn counter_key(&self) -> MetaKey {
        match self {
            Self::Favorite => MetaKey::FavoritesCount,
            Self::Bookmark => MetaKey::BookmarksCount,
            Self::Interest => MetaKey::InterestCount,
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored relation row; unique per (kind, subject, object)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngagementRelation {
    pub kind: RelationKind,
    pub subject_id: EntityId,
    pub object_id: EntityId,
    pub created_at: DateTime<Utc>,
}

impl EngagementRelation {
    pub fn new(kind: RelationKind, subject_id: EntityId, object_id: EntityId) -> Self {
        Self {
            kind,
            subject_id,
            object_id,
            created_at: Utc::now(),
        }
    }
}

/// Direction a toggle went
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleState {
    Added,
    Removed,
}

impl ToggleState {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Removed => "removed",
        }
    }
}

/// Result of a toggle: the new state and the recomputed count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleOutcome {
    pub state: ToggleState,
    pub count: i64,
}
