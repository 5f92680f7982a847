//! Actors and their capabilities.
//!
//! Sign-in is handled by the identity provider. This module only turns the
//! provider's role claim into the capabilities the ledger checks.

use milebook_shared::Claims;
use milebook_shared::auth::{ROLE_ADMIN, ROLE_SERVICE};
use milebook_shared::types::UserId;
use serde::{Deserialize, Serialize};

/// Role of an actor within Milebook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorRole {
    /// Regular user managing their own vehicles and trips.
    User,
    /// Administrator who may reopen locked tax years.
    Admin,
}

impl ActorRole {
    /// Maps the identity provider's role claim.
    ///
    /// Unknown roles get the least privileged role.
    #[must_use]
    pub fn from_claim(role: &str) -> Self {
        match role {
            ROLE_ADMIN | ROLE_SERVICE => Self::Admin,
            _ => Self::User,
        }
    }

    /// Returns true if this role can unlock a locked year.
    #[must_use]
    pub const fn can_unlock_years(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::fmt::Display for ActorRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

/// The authenticated caller of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    /// User ID at the identity provider.
    pub user_id: UserId,
    /// Role derived from the identity token.
    pub role: ActorRole,
}

impl Actor {
    /// Creates a regular user actor.
    #[must_use]
    pub const fn user(user_id: UserId) -> Self {
        Self {
            user_id,
            role: ActorRole::User,
        }
    }

    /// Creates an administrator actor.
    #[must_use]
    pub const fn admin(user_id: UserId) -> Self {
        Self {
            user_id,
            role: ActorRole::Admin,
        }
    }

    /// Returns true if the actor can unlock a locked year.
    #[must_use]
    pub const fn can_unlock_years(&self) -> bool {
        self.role.can_unlock_years()
    }
}

impl From<&Claims> for Actor {
    fn from(claims: &Claims) -> Self {
        Self {
            user_id: UserId::from_uuid(claims.user_id()),
            role: ActorRole::from_claim(&claims.role),
        }
    }
}
