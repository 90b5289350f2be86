//! Entity ID - store-assigned 64-bit identifier for users and posts
//!
//! IDs are positive integers handed out by the backing store. Zero is reserved
//! for "no user" (anonymous visitors) and is never assigned to a row.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Identifier of a user or a post
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct EntityId(i64);

impl EntityId {
    /// The anonymous visitor
    pub const ANONYMOUS: Self = Self(0);

    /// Create a new EntityId from a raw i64 value
    #[inline]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the inner i64 value
    #[inline]
    pub const fn into_inner(self) -> i64 {
        self.0
    }

    /// Check if this is the anonymous (unassigned) id
    #[inline]
    pub const fn is_anonymous(&self) -> bool {
        self.0 == 0
    }

    /// Parse from a decimal string, rejecting zero and negative values
    pub fn parse(s: &str) -> Result<Self, EntityIdParseError> {
        let value = s
            .trim()
            .parse::<i64>()
            .map_err(|_| EntityIdParseError::InvalidFormat)?;

        if value <= 0 {
            return Err(EntityIdParseError::NotPositive);
        }

        Ok(Self(value))
    }
}

/// Error when parsing an EntityId from string
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EntityIdParseError {
    #[error("invalid id format")]
    InvalidFormat,

    #[error("id must be a positive integer")]
    NotPositive,
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for EntityId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<EntityId> for i64 {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

impl std::str::FromStr for EntityId {
    type Err = EntityIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityId::parse(s)
    }
}

impl Serialize for EntityId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(self.0)
    }
}

// Form fields arrive as strings, JSON bodies as numbers
impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct EntityIdVisitor;

        impl Visitor<'_> for EntityIdVisitor {
            type Value = EntityId;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a positive integer or a string containing one")
            }

            fn visit_i64<E>(self, value: i64) -> Result<EntityId, E>
            where
                E: de::Error,
            {
                if value <= 0 {
                    return Err(de::Error::custom(EntityIdParseError::NotPositive));
                }
                Ok(EntityId(value))
            }

            fn visit_u64<E>(self, value: u64) -> Result<EntityId, E>
            where
                E: de::Error,
            {
                i64::try_from(value)
                    .map_err(|_| de::Error::custom(EntityIdParseError::InvalidFormat))
                    .and_then(|v| self.visit_i64(v))
            }

            fn visit_str<E>(self, value: &str) -> Result<EntityId, E>
            where
                E: de::Error,
            {
                EntityId::parse(value).map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_any(EntityIdVisitor)
    }
}
