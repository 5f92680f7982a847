//! Authentication middleware for protected routes.

use axum::{
    Json,
    extract::{FromRequestParts, Request, State},
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use milebook_core::auth::Actor;
use milebook_shared::types::UserId;
use milebook_shared::{Claims, JwtError};
use serde_json::json;

use crate::AppState;

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
}

/// Authentication middleware that validates identity-provider tokens.
///
/// Valid claims are stored in the request extensions for [`AuthUser`].
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let Some(token) = auth_header.and_then(extract_bearer_token) else {
        return unauthorized("Authorization header with Bearer token is required");
    };

    match state.jwt_service.validate_token(token) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(JwtError::Expired) => unauthorized("Token has expired"),
        Err(e) => {
            tracing::debug!(error = %e, "Rejected bearer token");
            unauthorized("Invalid or malformed token")
        }
    }
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "UNAUTHORIZED",
            "message": message
        })),
    )
        .into_response()
}

/// Extractor for the authenticated caller.
///
/// ```ignore
/// async fn handler(auth: AuthUser) -> impl IntoResponse {
///     let user_id = auth.user_id();
///     // ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// Returns the user ID from the claims.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        UserId::from_uuid(self.0.user_id())
    }

    /// Returns the caller as a ledger actor.
    #[must_use]
    pub fn actor(&self) -> Actor {
        Actor::from(&self.0)
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| unauthorized("Authentication required"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(extract_bearer_token("bearer abc"), Some("abc"));
        assert_eq!(extract_bearer_token("Basic abc"), None);
        assert_eq!(extract_bearer_token("abc"), None);
    }
}
