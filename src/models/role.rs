use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Roles as stored in the `roles` table.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(try_from = "i32", into = "i32")]
pub enum Role {
    User,
    Admin,
    Publisher,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::User, Role::Admin, Role::Publisher];

    pub fn id(self) -> i32 {
        match self {
            Role::User => 1,
            Role::Admin => 2,
            Role::Publisher => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
            Role::Publisher => "publisher",
        }
    }

    pub fn from_id(id: i32) -> Result<Self> {
        Role::ALL
            .iter()
            .copied()
            .find(|role| role.id() == id)
            .ok_or_else(|| anyhow!("Unknown role id {}", id))
    }

    /// Roles a member may pick when joining an organization.
    pub fn joinable(self) -> bool {
        matches!(self, Role::User | Role::Publisher)
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

impl TryFrom<i32> for Role {
    type Error = anyhow::Error;

    fn try_from(id: i32) -> Result<Self> {
        Role::from_id(id)
    }
}

impl From<Role> for i32 {
    fn from(role: Role) -> i32 {
        role.id()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
