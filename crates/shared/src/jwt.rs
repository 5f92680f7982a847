//! JWT validation for identity-provider access tokens.
//!
//! Tokens are HS256-signed by the identity provider. Issuing is supported
//! for local tooling (seeder, tests) that needs a valid token.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;
use uuid::Uuid;

use crate::auth::Claims;
use crate::config::AuthConfig;

/// JWT configuration.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key shared with the identity provider.
    pub secret: String,
    /// Expected audience, if any.
    pub audience: Option<String>,
    /// Lifetime in seconds of locally issued tokens.
    pub token_expires_secs: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "change-me-in-production".to_string(),
            audience: None,
            token_expires_secs: 3600,
        }
    }
}

impl From<&AuthConfig> for JwtConfig {
    fn from(config: &AuthConfig) -> Self {
        Self {
            secret: config.jwt_secret.clone(),
            audience: config.audience.clone(),
            token_expires_secs: i64::try_from(config.token_expiry_secs).unwrap_or(i64::MAX),
        }
    }
}

/// Errors that can occur during JWT operations.
#[derive(Debug, Error)]
pub enum JwtError {
    /// Token encoding failed.
    #[error("failed to encode token: {0}")]
    EncodingError(String),

    /// Token decoding failed.
    #[error("failed to decode token: {0}")]
    DecodingError(String),

    /// Token has expired.
    #[error("token has expired")]
    Expired,

    /// Token is invalid.
    #[error("invalid token")]
    Invalid,
}

/// JWT service for token operations.
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("audience", &self.config.audience)
            .field("token_expires_secs", &self.config.token_expires_secs)
            .field("encoding_key", &"[hidden]")
            .field("decoding_key", &"[hidden]")
            .finish()
    }
}

impl JwtService {
    /// Creates a new JWT service with the given configuration.
    #[must_use]
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Issues an access token for a user with the given role.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::EncodingError` if token generation fails.
    pub fn issue_token(&self, user_id: Uuid, role: &str) -> Result<String, JwtError> {
        let expires_at = Utc::now() + Duration::seconds(self.config.token_expires_secs);
        let mut claims = Claims::new(user_id, role, expires_at);
        claims.aud.clone_from(&self.config.audience);

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingError(e.to_string()))
    }

    /// Validates and decodes a token.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::Expired` if the token has expired.
    /// Returns `JwtError::Invalid` if the signature or audience does not match.
    /// Returns `JwtError::DecodingError` if the token is malformed.
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        match &self.config.audience {
            Some(aud) => validation.set_audience(&[aud]),
            None => validation.validate_aud = false,
        }

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
                jsonwebtoken::errors::ErrorKind::InvalidSignature
                | jsonwebtoken::errors::ErrorKind::InvalidAudience => JwtError::Invalid,
                _ => JwtError::DecodingError(e.to_string()),
            })
    }
}
