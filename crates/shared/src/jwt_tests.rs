//! Unit tests for identity claims.

use crate::auth::{Claims, ROLE_ADMIN, ROLE_SERVICE, ROLE_USER};
use chrono::{Duration, Utc};
use serde_json::json;
use uuid::Uuid;

#[test]
fn test_claims_new_sets_correct_fields() {
    let user_id = Uuid::new_v4();
    let expires_at = Utc::now() + Duration::hours(1);

    let claims = Claims::new(user_id, ROLE_USER, expires_at);

    assert_eq!(claims.sub, user_id);
    assert_eq!(claims.role, ROLE_USER);
    assert!(claims.iat <= Utc::now().timestamp());
    assert_eq!(claims.exp, expires_at.timestamp());
    assert!(claims.email.is_none());
}

#[test]
fn test_admin_roles() {
    let expires_at = Utc::now() + Duration::hours(1);

    assert!(Claims::new(Uuid::new_v4(), ROLE_ADMIN, expires_at).is_admin());
    assert!(Claims::new(Uuid::new_v4(), ROLE_SERVICE, expires_at).is_admin());
    assert!(!Claims::new(Uuid::new_v4(), ROLE_USER, expires_at).is_admin());
    assert!(!Claims::new(Uuid::new_v4(), "anon", expires_at).is_admin());
}

#[test]
fn test_provider_payload_deserializes() {
    let user_id = Uuid::new_v4();
    let payload = json!({
        "sub": user_id,
        "email": "driver@example.com",
        "aud": "authenticated",
        "iat": 1_700_000_000,
        "exp": 1_700_003_600,
        "app_metadata": { "provider": "email" },
        "session_id": "abc"
    });

    let claims: Claims = serde_json::from_value(payload).unwrap();

    assert_eq!(claims.user_id(), user_id);
    assert_eq!(claims.role, ROLE_USER);
    assert_eq!(claims.email.as_deref(), Some("driver@example.com"));
    assert_eq!(claims.aud.as_deref(), Some("authenticated"));
}
