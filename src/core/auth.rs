//! Roles, the request actor, and role-based access policies
//!
//! Every authenticated request carries an [`Actor`]. Handlers gate access
//! with an [`AuthPolicy`]; the validation engine only ever looks at the
//! actor through conditional-requiredness predicates.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Staff access level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "level1")]
    Level1,
    #[serde(rename = "level2")]
    Level2,
    #[serde(rename = "level3")]
    Level3,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Level1, Role::Level2, Role::Level3];

    pub const VALUES: &'static [&'static str] = &["level1", "level2", "level3"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Level1 => "level1",
            Role::Level2 => "level2",
            Role::Level3 => "level3",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| format!("unknown role '{}'", s))
    }
}

/// Identity of the requester
///
/// Opaque to the validation engine except for conditional requiredness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Actor {
    /// A signed-in staff user
    User { user_id: String, role: Role },

    /// No identity (seeding, internal calls, tests)
    Anonymous,
}

impl Actor {
    pub fn user(user_id: impl Into<String>, role: Role) -> Self {
        Actor::User {
            user_id: user_id.into(),
            role,
        }
    }

    pub fn user_id(&self) -> Option<&str> {
        match self {
            Actor::User { user_id, .. } => Some(user_id),
            Actor::Anonymous => None,
        }
    }

    pub fn role(&self) -> Option<Role> {
        match self {
            Actor::User { role, .. } => Some(*role),
            Actor::Anonymous => None,
        }
    }
}

/// Authorization policy for an operation
#[derive(Debug, Clone)]
pub enum AuthPolicy {
    /// Any signed-in user, whatever the role
    Authenticated,

    /// User must have one of these roles
    HasRole(Vec<Role>),
}

impl AuthPolicy {
    /// Shorthand for a role list
    pub fn roles(roles: &[Role]) -> Self {
        AuthPolicy::HasRole(roles.to_vec())
    }

    /// Check if the actor satisfies this policy
    pub fn check(&self, actor: &Actor) -> bool {
        match (self, actor) {
            (_, Actor::Anonymous) => false,
            (AuthPolicy::Authenticated, Actor::User { .. }) => true,
            (AuthPolicy::HasRole(allowed), Actor::User { role, .. }) => allowed.contains(role),
        }
    }
}
