//! Annotator accounts and the groups partitioning the task pool.

use super::{GroupId, Role, UserId};
use serde::{Deserialize, Serialize};

/// Annotator account as seen by the workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    name: String,
    email: String,
    role: Role,
    group_id: GroupId,
}

impl User {
    /// Creates a user record.
    #[must_use]
    pub fn new(
        id: UserId,
        name: impl Into<String>,
        email: impl Into<String>,
        role: Role,
        group_id: GroupId,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            role,
            group_id,
        }
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the unique email address.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the fixed account role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns the group whose tasks this user may draw.
    #[must_use]
    pub const fn group_id(&self) -> GroupId {
        self.group_id
    }
}

/// Partition of tasks and users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    id: GroupId,
    name: String,
}

impl Group {
    /// Creates a group record.
    #[must_use]
    pub fn new(id: GroupId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Returns the group identifier.
    #[must_use]
    pub const fn id(&self) -> GroupId {
        self.id
    }

    /// Returns the group name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}
