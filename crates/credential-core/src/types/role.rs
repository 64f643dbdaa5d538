//! Roles as reported by the external role-assignment store.

use serde::{Deserialize, Serialize};

/// Tag attached to a role describing what it grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleTag {
    /// Full administrative rights.
    Admin,
    /// Operator rights without administration.
    Operator,
    /// Read-only access.
    Monitor,
}

/// A role assigned to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Display name of the role.
    pub name: String,
    /// Tags the role carries.
    #[serde(default)]
    pub tags: Vec<RoleTag>,
}

impl Role {
    /// Creates a role with the given name and tags.
    pub fn new(name: impl Into<String>, tags: Vec<RoleTag>) -> Self {
        Self {
            name: name.into(),
            tags,
        }
    }

    /// Returns whether the role carries `tag`.
    pub fn has_tag(&self, tag: RoleTag) -> bool {
        self.tags.contains(&tag)
    }
}
