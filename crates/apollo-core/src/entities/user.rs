//! User entity - a site account

use chrono::{DateTime, Utc};
use std::fmt;

use crate::value_objects::{Capabilities, EntityId};

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Role {
    #[default]
    Subscriber,
    Editor,
    Administrator,
}

impl Role {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Subscriber => "subscriber",
            Self::Editor => "editor",
            Self::Administrator => "administrator",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "subscriber" => Some(Self::Subscriber),
            "editor" => Some(Self::Editor),
            "administrator" => Some(Self::Administrator),
            _ => None,
        }
    }

    /// Capability set granted by this role
    pub const fn capabilities(&self) -> Capabilities {
        match self {
            Self::Subscriber => Capabilities::READ,
            Self::Editor => Capabilities::EDITOR,
            Self::Administrator => Capabilities::ALL,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: EntityId,
    pub login: String,
    pub email: String,
    pub display_name: String,
    pub role: Role,
    pub registered_at: DateTime<Utc>,
}

impl User {
    #[inline]
    pub fn capabilities(&self) -> Capabilities {
        self.role.capabilities()
    }

    /// Check a single capability
    #[inline]
    pub fn can(&self, capability: Capabilities) -> bool {
        self.capabilities().has(capability)
    }
}

/// Data for a user that has not been stored yet
#[derive(Debug, Clone)]
pub struct NewUser {
    pub login: String,
    pub email: String,
    pub display_name: String,
    pub role: Role,
}

impl NewUser {
    /// New subscriber whose display name defaults to the login
    pub fn new(login: String, email: String) -> Self {
        Self {
            display_name: login.clone(),
            login,
            email,
            role: Role::Subscriber,
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }
}
