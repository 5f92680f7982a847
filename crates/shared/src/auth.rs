//! Identity token claims.
//!
//! The identity provider owns sign-in and sessions; this service only reads
//! who the caller is and which role the provider granted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role granted to regular end users.
pub const ROLE_USER: &str = "authenticated";

/// Role granted to administrators.
pub const ROLE_ADMIN: &str = "admin";

/// Role used by trusted backend services.
pub const ROLE_SERVICE: &str = "service_role";

/// JWT claims carried by identity-provider access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: Uuid,
    /// Role granted by the identity provider.
    #[serde(default = "default_role")]
    pub role: String,
    /// Email of the user, when the provider includes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Audience, when the provider includes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

fn default_role() -> String {
    ROLE_USER.to_string()
}

impl Claims {
    /// Creates new claims for a user.
    #[must_use]
    pub fn new(user_id: Uuid, role: &str, expires_at: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            role: role.to_string(),
            email: None,
            aud: None,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the user ID from claims.
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.sub
    }

    /// Returns true if the provider granted an administrative role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN || self.role == ROLE_SERVICE
    }
}
